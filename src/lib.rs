//! Cycle-counting 6502 instruction interpreter.
//!
//! A [`Cpu`] is bound to a [`Memory`] for its whole lifetime. Callers poke a
//! program into memory, point `pc` at it and call [`Cpu::run`], which executes
//! until a BRK halts the core.
//!
//! ```
//! use mos6502_core::{BasicMemory, Cpu, Flag};
//!
//! let mut memory = BasicMemory::new();
//! memory.load(0x0200, &[0xA9, 0x42, 0x00]); // LDA #$42; BRK
//!
//! let mut cpu = Cpu::new(&mut memory);
//! cpu.pc = 0x0200;
//! cpu.run().unwrap();
//!
//! assert_eq!(cpu.a, 0x42);
//! assert!(!cpu.flag(Flag::Zero));
//! assert_eq!(cpu.cycles(), 9);
//! assert_eq!(cpu.pc, 0x0203);
//! ```

pub mod cpu;
pub mod memory;

pub use cpu::addressing::{AddressResult, AddressingMode};
pub use cpu::opcodes::{Instruction, OPCODES, Opcode};
pub use cpu::{Cpu, CpuError, Flag, StatusFlags};
pub use memory::{BasicMemory, MEMORY_SIZE, Memory};
