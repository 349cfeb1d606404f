/*! A regular expression engine built on the Thompson/Pike virtual
machine model.

A pattern is compiled into a linear program of small instructions, and a
[Pike VM](https://swtch.com/~rsc/regexp/regexp2.html) executes that
program against a subject by simulating the equivalent NFA in lockstep.
Matching time is linear in the subject and program sizes regardless of
backtracking pathologies, and capturing groups are supported.

The pipeline has four stages: a tokenizer, a recursive-descent parser, a
code generator that lowers the parse tree into a program with resolved
jump targets, and the VM itself. Programs can also be written out and
read back in a textual assembly-like form.

# Example

```rust
let program = pike::compile(b"(a+)(b+)").unwrap();

let mut vm = pike::PikeVM::new(&program);
let m = vm.try_match(b"aabb").unwrap();

assert_eq!(m.end(), 4);
assert_eq!(m.captures().get(0), Some((0, 2)));
assert_eq!(m.captures().get(1), Some((2, 4)));
```

The supported syntax covers single-byte literals, `.`, the quantifiers
`+`, `*` and `?` with non-greedy variants (`+?`, `*?`, `??`),
alternation, capturing groups, and character classes like `[a-z0-9-]`
and `[^a-c]`. Matching is anchored at the start of the subject and a
match may end before the subject does.
*/

pub use asm::parse_program;
pub use compiler::compile;
pub use compiler::Compiler;
pub use errors::CompileError;
pub use errors::Error;
pub use errors::ParseError;
pub use errors::ProgramError;
pub use instr::ClassRanges;
pub use instr::Instr;
pub use instr::Program;
pub use parser::NonTerminal;
pub use parser::ParseTree;
pub use parser::Parser;
pub use pikevm::Captures;
pub use pikevm::Match;
pub use pikevm::PikeVM;
pub use pikevm::UNSET;
pub use tokenizer::Token;
pub use tokenizer::Tokenizer;

mod asm;
mod compiler;
mod errors;
mod instr;
mod parser;
mod pikevm;
mod tokenizer;
