/*! A [Pike VM](https://swtch.com/~rsc/regexp/regexp2.html) that executes
programs produced by the [compiler][`crate::compiler::Compiler`].

The VM simulates the NFA described by the program by keeping a set of
threads, one per NFA state the automaton could currently be in, and
advancing all of them in lockstep over the subject. A thread is a
program counter plus an array of capture slots. Threads are cheap, they
are not OS threads.

The key to linear-time matching is that the VM never keeps two threads
at the same instruction: when a thread is about to be added at a program
counter that was already reached at the current input position, it is
dropped. The number of live threads is therefore bounded by the program
length, and the total work is proportional to the subject length times
the program length, no matter how pathological the pattern is.
*/

use std::fmt;
use std::mem;

use itertools::Itertools;

use crate::instr::{Instr, Program};

/// The value of a capture slot that was never saved.
pub const UNSET: usize = usize::MAX;

/// Executes a compiled [`Program`] against subjects.
///
/// The VM owns all mutable state needed for execution, so any number of
/// VMs can share one program. A single VM runs one match at a time and
/// can be reused for any number of subjects.
///
/// ```
/// let program = pike::compile(b"(a+)(b+)").unwrap();
/// let mut vm = pike::PikeVM::new(&program);
///
/// let m = vm.try_match(b"aabb").unwrap();
/// assert_eq!(m.end(), 4);
/// assert_eq!(m.captures().get(0), Some((0, 2)));
/// assert_eq!(m.captures().get(1), Some((2, 4)));
/// ```
pub struct PikeVM<'r> {
    prog: &'r Program,
    /// The threads being executed at the current input position.
    threads: Vec<Thread>,
    /// The threads that will run once the next byte is consumed.
    next_threads: Vec<Thread>,
    /// For each instruction, the last input position at which a thread
    /// was added for it. Threads reaching an instruction a second time
    /// at the same position are redundant and get dropped.
    visited: Vec<usize>,
    /// Scratch stack for [`epsilon_closure`], kept here so its
    /// allocation is reused across steps.
    closure_stack: Vec<(usize, Vec<usize>)>,
}

struct Thread {
    pc: usize,
    saved: Vec<usize>,
}

impl<'r> PikeVM<'r> {
    /// Creates a new [`PikeVM`] for the given program.
    pub fn new(prog: &'r Program) -> Self {
        Self {
            prog,
            threads: Vec::with_capacity(prog.len()),
            next_threads: Vec::with_capacity(prog.len()),
            visited: vec![UNSET; prog.len()],
            closure_stack: Vec::new(),
        }
    }

    /// Runs the program against `subject` and returns the match, if
    /// any.
    ///
    /// Matching is anchored at the start of the subject. The reported
    /// end is the longest one the greedy/non-greedy policy of the
    /// pattern can reach, and it may lie short of the end of the
    /// subject: a match of a prefix is a match.
    pub fn try_match(&mut self, subject: &[u8]) -> Option<Match> {
        if self.prog.is_empty() {
            return None;
        }

        let nslots = self.prog.capture_slots();
        let mut matched: Option<(usize, Vec<usize>)> = None;

        self.visited.fill(UNSET);
        self.threads.clear();
        self.next_threads.clear();

        epsilon_closure(
            self.prog,
            0,
            vec![UNSET; nslots],
            0,
            &mut self.closure_stack,
            &mut self.visited,
            &mut self.threads,
        );

        let mut sp = 0;
        while !self.threads.is_empty() {
            let byte = subject.get(sp).copied();

            let mut threads = mem::take(&mut self.threads);
            for thread in threads.drain(..) {
                let next_pc = thread.pc + 1;
                match self.prog.instr(thread.pc) {
                    Instr::Char(c) if byte == Some(*c) => epsilon_closure(
                        self.prog,
                        next_pc,
                        thread.saved,
                        sp + 1,
                        &mut self.closure_stack,
                        &mut self.visited,
                        &mut self.next_threads,
                    ),
                    Instr::Any if byte.is_some() => epsilon_closure(
                        self.prog,
                        next_pc,
                        thread.saved,
                        sp + 1,
                        &mut self.closure_stack,
                        &mut self.visited,
                        &mut self.next_threads,
                    ),
                    Instr::Ranges(ranges)
                        if byte.is_some_and(|b| ranges.contains(b)) =>
                    {
                        epsilon_closure(
                            self.prog,
                            next_pc,
                            thread.saved,
                            sp + 1,
                            &mut self.closure_stack,
                            &mut self.visited,
                            &mut self.next_threads,
                        )
                    }
                    Instr::NegRanges(ranges)
                        if byte.is_some_and(|b| !ranges.contains(b)) =>
                    {
                        epsilon_closure(
                            self.prog,
                            next_pc,
                            thread.saved,
                            sp + 1,
                            &mut self.closure_stack,
                            &mut self.visited,
                            &mut self.next_threads,
                        )
                    }
                    Instr::Match => {
                        // This is the highest-priority thread that can
                        // match at this position. The remaining threads
                        // in the list have lower priority, skip them for
                        // this step.
                        log::trace!("match at input position {}", sp);
                        matched = Some((sp, thread.saved));
                        break;
                    }
                    // The thread failed to consume, it dies here. Its
                    // capture slots are dropped with it.
                    _ => {}
                }
            }
            self.threads = threads;

            mem::swap(&mut self.threads, &mut self.next_threads);
            sp += 1;
        }

        matched.map(|(end, slots)| Match { end, captures: Captures { slots } })
    }
}

/// Computes the epsilon closure of the instruction at `start`.
///
/// The epsilon closure of an instruction is the set of consuming (or
/// `Match`) instructions that can be reached from it without consuming
/// input, following `Jump`, `Split` and `Save`. This function pushes a
/// thread for every instruction in the closure onto `closure`,
/// in priority order: both operands of a `Split` are explored
/// depth-first, first operand first, so threads spawned through a
/// split's first operand end up ahead of those spawned through its
/// second operand.
///
/// `pos` is the input position the closure is computed at. `Save`
/// instructions record it, and `visited` entries are stamped with it:
/// an instruction whose stamp already equals `pos` has been reached
/// before during this step, and exploring it again is redundant. This
/// is what bounds the closure (and the thread lists) by the program
/// length.
///
/// `stack` is scratch storage. It must be empty when the function is
/// called, and is empty again when it returns.
fn epsilon_closure(
    prog: &Program,
    start: usize,
    saved: Vec<usize>,
    pos: usize,
    stack: &mut Vec<(usize, Vec<usize>)>,
    visited: &mut [usize],
    closure: &mut Vec<Thread>,
) {
    debug_assert!(stack.is_empty());
    stack.push((start, saved));

    while let Some((pc, mut saved)) = stack.pop() {
        if visited[pc] == pos {
            continue;
        }
        visited[pc] = pos;

        match prog.instr(pc) {
            Instr::Jump(x) => stack.push((*x, saved)),
            Instr::Split(x, y) => {
                // The stack is LIFO: push `y` first so that `x` is
                // explored first and keeps the higher priority.
                stack.push((*y, saved.clone()));
                stack.push((*x, saved));
            }
            Instr::Save(slot) => {
                saved[*slot] = pos;
                stack.push((pc + 1, saved));
            }
            _ => closure.push(Thread { pc, saved }),
        }
    }
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    end: usize,
    captures: Captures,
}

impl Match {
    /// Returns the position right after the last matched byte. The
    /// matched prefix of the subject is `0..end`.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the capture groups of the match.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }
}

/// The capture slots recorded by a match.
///
/// Group `k` is described by slots `2k` and `2k+1`. Groups that did not
/// take part in the match keep the [`UNSET`] sentinel in their slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    slots: Vec<usize>,
}

impl Captures {
    /// Returns the `(start, end)` positions of capture group `k`, or
    /// `None` if the group did not take part in the match.
    pub fn get(&self, k: usize) -> Option<(usize, usize)> {
        match (self.slots.get(2 * k), self.slots.get(2 * k + 1)) {
            (Some(&start), Some(&end)) if start != UNSET && end != UNSET => {
                Some((start, end))
            }
            _ => None,
        }
    }

    /// Returns the number of capture groups.
    pub fn group_count(&self) -> usize {
        self.slots.len() / 2
    }

    /// Returns true if the program had no capture groups at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the raw capture slots.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }
}

impl fmt::Display for Captures {
    /// Formats the captures as `(s0,s1) (s2,s3) …`, with `(?,?)` for
    /// groups that did not take part in the match.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (start, end)) in self.slots.iter().tuples().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if *start == UNSET || *end == UNSET {
                write!(f, "(?,?)")?;
            } else {
                write!(f, "({},{})", start, end)?;
            }
        }
        Ok(())
    }
}
