
use std::fs;
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{arg, Arg, ArgAction, ArgMatches, Command};
use yansi::Color::Red;
use yansi::Paint;

use pike::{compile, parse_program, PikeVM, Program};

const EXIT_ERROR: i32 = 1;

fn cli() -> Command {
    Command::new("pike")
        .about("Match subjects against a Pike-VM regular expression")
        .version(env!("CARGO_PKG_VERSION"))
        .help_template(
            r#"{about-with-newline}
{usage-heading}
  {usage}

{all-args}
"#,
        )
        .arg(arg!(<PATTERN> "Pattern, or path to a program file").help(
            "If PATTERN names a readable file it is read as a program \
             listing, otherwise it is compiled as a pattern",
        ))
        .arg(
            arg!(<SUBJECT> "Subject strings to match")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("emit-code")
                .short('e')
                .long("emit-code")
                .action(ArgAction::SetTrue)
                .help("Print the program listing before matching"),
        )
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    let args = match cli().try_get_matches() {
        Ok(args) => args,
        Err(err) => {
            use clap::error::ErrorKind;
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_ERROR,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("{} {}", "error:".paint(Red).bold(), err);
        process::exit(EXIT_ERROR);
    }
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let program = load_program(pattern)?;

    if args.get_flag("emit-code") {
        print!("{}", program);
    }

    let mut vm = PikeVM::new(&program);

    for subject in args.get_many::<String>("SUBJECT").unwrap() {
        match vm.try_match(subject.as_bytes()) {
            Some(m) if m.captures().is_empty() => {
                println!("\"{}\": match({})", subject, m.end())
            }
            Some(m) => println!(
                "\"{}\": match({}) {}",
                subject,
                m.end(),
                m.captures()
            ),
            None => println!("\"{}\": no match", subject),
        }
    }

    Ok(())
}

/// Returns the program for PATTERN, either by reading it as a program
/// listing if it names a file, or by compiling it as a pattern.
fn load_program(pattern: &str) -> anyhow::Result<Program> {
    if Path::new(pattern).is_file() {
        let text = fs::read_to_string(pattern)
            .with_context(|| format!("can not read `{}`", pattern))?;
        Ok(parse_program(&text)?)
    } else {
        Ok(compile(pattern.as_bytes())?)
    }
}
