/*! Reads and writes programs in a textual, assembly-like form.

A program listing consists of lines that are either blank, a label like
`L1:`, or an instruction indented by whitespace. A `;` starts a comment
that runs to the end of the line. For example:

```text
; the program for a+b
L1:
    char a
    split L1 L2
L2:
    char b
    match
```

The instructions are `char C`, `any`, `range LO-HI ...`,
`nrange LO-HI ...`, `jump LABEL`, `split LABEL LABEL`, `save N` and
`match`. A `char` operand is the character itself when printable, `\n`
for a newline, or `\xNN` otherwise. Range bounds are two hex digits
each, and a single instruction carries one or more ranges.

A label names the instruction that follows it. The writer only emits
labels for instructions that are actually the target of a jump or
split, numbering them `L1, L2, …` in instruction order; the reader
accepts any label name.
*/

use std::collections::HashMap;
use std::fmt;

use bitvec::vec::BitVec;

use crate::errors::ProgramError;
use crate::instr::{ClassRanges, Instr, Program};

impl fmt::Display for Program {
    /// Formats the program as a listing that [`parse_program`] can read
    /// back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Find every instruction that needs a label.
        let mut is_target: BitVec = BitVec::repeat(false, self.len());
        for instr in self.iter() {
            match instr {
                Instr::Jump(x) => is_target.set(*x, true),
                Instr::Split(x, y) => {
                    is_target.set(*x, true);
                    is_target.set(*y, true);
                }
                _ => {}
            }
        }

        let mut labels = vec![0; self.len()];
        let mut next_label = 1;
        for i in is_target.iter_ones() {
            labels[i] = next_label;
            next_label += 1;
        }

        for (i, instr) in self.iter().enumerate() {
            if labels[i] > 0 {
                writeln!(f, "L{}:", labels[i])?;
            }
            match instr {
                Instr::Char(c) => {
                    writeln!(f, "    char {}", CharOperand(*c))?
                }
                Instr::Any => writeln!(f, "    any")?,
                Instr::Ranges(ranges) => {
                    writeln!(f, "    range {}", RangesOperand(ranges))?
                }
                Instr::NegRanges(ranges) => {
                    writeln!(f, "    nrange {}", RangesOperand(ranges))?
                }
                Instr::Jump(x) => writeln!(f, "    jump L{}", labels[*x])?,
                Instr::Split(x, y) => {
                    writeln!(f, "    split L{} L{}", labels[*x], labels[*y])?
                }
                Instr::Save(slot) => writeln!(f, "    save {}", slot)?,
                Instr::Match => writeln!(f, "    match")?,
            }
        }

        Ok(())
    }
}

struct CharOperand(u8);

impl fmt::Display for CharOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\n' => write!(f, "\\n"),
            // A literal ';' would read back as a comment.
            b';' => write!(f, "\\x3b"),
            c if c.is_ascii_graphic() => write!(f, "{}", c as char),
            c => write!(f, "\\x{:02x}", c),
        }
    }
}

struct RangesOperand<'a>(&'a ClassRanges);

impl fmt::Display for RangesOperand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (lo, hi)) in self.0.ranges().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}-{:02x}", lo, hi)?;
        }
        Ok(())
    }
}

/// How a line of the listing is classified after stripping comments and
/// whitespace.
enum Line<'a> {
    Blank,
    Label(&'a str),
    Code(Vec<&'a str>),
}

/// Parses a program from its textual form.
///
/// Aborts with a [`ProgramError`] on unknown opcodes, unresolvable
/// labels and wrong operand counts. No partial program is returned.
pub fn parse_program(text: &str) -> Result<Program, ProgramError> {
    // Classify all lines first so that labels can be resolved in a
    // single later pass no matter where they appear.
    let lines: Vec<Line> = text.lines().map(classify_line).collect();

    // Associate each label with the position of the next instruction.
    let mut labels: HashMap<&str, usize> = HashMap::new();
    let mut ninstr = 0;
    for line in &lines {
        match line {
            Line::Label(name) => {
                labels.entry(*name).or_insert(ninstr);
            }
            Line::Code(_) => ninstr += 1,
            Line::Blank => {}
        }
    }

    let mut instrs = Vec::with_capacity(ninstr);
    for (lineno, line) in lines.iter().enumerate() {
        let lineno = lineno + 1;
        match line {
            Line::Code(tokens) => {
                instrs.push(read_instr(tokens, lineno, &labels, ninstr)?)
            }
            Line::Label(name) => {
                if labels[*name] >= ninstr {
                    return Err(ProgramError::DanglingLabel {
                        line: lineno,
                        label: name.to_string(),
                    });
                }
            }
            Line::Blank => {}
        }
    }

    Ok(Program::new(instrs))
}

fn classify_line(line: &str) -> Line {
    let line = match line.split_once(';') {
        Some((code, _comment)) => code,
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        Line::Blank
    } else if let Some(name) = line.strip_suffix(':') {
        Line::Label(name)
    } else {
        Line::Code(line.split_whitespace().collect())
    }
}

/// Parses a single instruction from its whitespace-separated tokens.
fn read_instr(
    tokens: &[&str],
    line: usize,
    labels: &HashMap<&str, usize>,
    ninstr: usize,
) -> Result<Instr, ProgramError> {
    let opcode = tokens[0];
    let operands = &tokens[1..];

    let expect_operands = |n: usize| {
        if operands.len() == n {
            Ok(())
        } else {
            Err(ProgramError::WrongOperandCount {
                line,
                opcode: opcode.to_string(),
                expected: n,
                found: operands.len(),
            })
        }
    };

    let target = |label: &str| {
        let target = *labels.get(label).ok_or_else(|| {
            ProgramError::UnknownLabel { line, label: label.to_string() }
        })?;
        if target >= ninstr {
            return Err(ProgramError::DanglingLabel {
                line,
                label: label.to_string(),
            });
        }
        Ok(target)
    };

    match opcode {
        "char" => {
            expect_operands(1)?;
            Ok(Instr::Char(parse_char(operands[0], line)?))
        }
        "any" => {
            expect_operands(0)?;
            Ok(Instr::Any)
        }
        "range" | "nrange" => {
            if operands.is_empty() {
                return Err(ProgramError::WrongOperandCount {
                    line,
                    opcode: opcode.to_string(),
                    expected: 1,
                    found: 0,
                });
            }
            let ranges = operands
                .iter()
                .map(|operand| parse_range(operand, line))
                .collect::<Result<Vec<_>, _>>()?;
            let ranges = ClassRanges::new(ranges);
            if opcode == "range" {
                Ok(Instr::Ranges(ranges))
            } else {
                Ok(Instr::NegRanges(ranges))
            }
        }
        "jump" => {
            expect_operands(1)?;
            Ok(Instr::Jump(target(operands[0])?))
        }
        "split" => {
            expect_operands(2)?;
            Ok(Instr::Split(target(operands[0])?, target(operands[1])?))
        }
        "save" => {
            expect_operands(1)?;
            let slot = operands[0].parse().map_err(|_| {
                ProgramError::BadOperand {
                    line,
                    operand: operands[0].to_string(),
                }
            })?;
            Ok(Instr::Save(slot))
        }
        "match" => {
            expect_operands(0)?;
            Ok(Instr::Match)
        }
        _ => Err(ProgramError::UnknownOpcode {
            line,
            opcode: opcode.to_string(),
        }),
    }
}

fn parse_char(operand: &str, line: usize) -> Result<u8, ProgramError> {
    let bad_operand = || ProgramError::BadOperand {
        line,
        operand: operand.to_string(),
    };

    let bytes = operand.as_bytes();
    match bytes {
        [c] => Ok(*c),
        [b'\\', b'n'] => Ok(b'\n'),
        [b'\\', b'x', hex @ ..] if hex.len() == 2 => {
            u8::from_str_radix(operand.get(2..).ok_or_else(bad_operand)?, 16)
                .map_err(|_| bad_operand())
        }
        _ => Err(bad_operand()),
    }
}

fn parse_range(operand: &str, line: usize) -> Result<(u8, u8), ProgramError> {
    let bad_operand = || ProgramError::BadOperand {
        line,
        operand: operand.to_string(),
    };

    let (lo, hi) = operand.split_once('-').ok_or_else(bad_operand)?;
    if lo.len() != 2 || hi.len() != 2 {
        return Err(bad_operand());
    }
    Ok((
        u8::from_str_radix(lo, 16).map_err(|_| bad_operand())?,
        u8::from_str_radix(hi, 16).map_err(|_| bad_operand())?,
    ))
}
