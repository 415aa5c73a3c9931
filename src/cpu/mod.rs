// 6502 CPU Emulator

pub mod addressing;
pub mod opcodes;

use std::fmt;

use anyhow::Result;
use log::{debug, error, trace};

use crate::memory::Memory;
use addressing::AddressingMode;
use opcodes::Instruction;

pub const STACK_BASE: u16 = 0x0100;
pub const POWER_ON_SP: u8 = 0xFF;
pub const POWER_ON_STATUS: u8 = 0x00;

/// A single bit of the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Carry,            // C
    Zero,             // Z
    InterruptDisable, // I
    Decimal,          // D (no effect on ADC/SBC here)
    Break,            // B
    Ignored,          // bit 5
    Overflow,         // V
    Negative,         // N
}

impl Flag {
    pub const fn mask(self) -> u8 {
        match self {
            Flag::Carry => 1 << 0,
            Flag::Zero => 1 << 1,
            Flag::InterruptDisable => 1 << 2,
            Flag::Decimal => 1 << 3,
            Flag::Break => 1 << 4,
            Flag::Ignored => 1 << 5,
            Flag::Overflow => 1 << 6,
            Flag::Negative => 1 << 7,
        }
    }
}

/// The packed status register (NV-BDIZC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags(u8);

impl StatusFlags {
    pub fn new() -> Self {
        Self(POWER_ON_STATUS)
    }

    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub fn set(&mut self, flag: Flag) {
        self.0 |= flag.mask();
    }

    pub fn clear(&mut self, flag: Flag) {
        self.0 &= !flag.mask();
    }

    pub fn assign(&mut self, flag: Flag, value: bool) {
        if value {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    pub fn update_zero_negative(&mut self, value: u8) {
        self.assign(Flag::Zero, value == 0);
        self.assign(Flag::Negative, value & 0x80 != 0);
    }
}

/// Fatal conditions raised by the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The fetched byte has no entry in the dispatch table.
    IllegalOpcode { opcode: u8, pc: u16 },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::IllegalOpcode { opcode, pc } => {
                write!(f, "illegal opcode 0x{:02X} at PC 0x{:04X}", opcode, pc)
            }
        }
    }
}

impl std::error::Error for CpuError {}

/// The processor core, bound to one memory for its whole lifetime.
///
/// There is no step limit: a program that never reaches BRK keeps `run`
/// looping forever. Callers that need a bound should drive `step` themselves.
pub struct Cpu<'a> {
    pub a: u8,      // Accumulator
    pub x: u8,      // X register
    pub y: u8,      // Y register
    pub pc: u16,    // Program counter
    pub sp: u8,     // Stack pointer (points to $0100 + sp)
    pub status: StatusFlags,
    cycles: u64, // Total cycles executed
    memory: &'a mut dyn Memory,

    // Per-instruction state
    opcode: u8,
    effective_address: u16,
    halted: bool,
}

impl<'a> Cpu<'a> {
    pub fn new(memory: &'a mut dyn Memory) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: POWER_ON_SP,
            status: StatusFlags::new(),
            cycles: 0,
            memory,
            opcode: 0,
            effective_address: 0,
            halted: false,
        }
    }

    /// Restore power-on state and zero the bound memory.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = POWER_ON_SP;
        self.status = StatusFlags::new();
        self.pc = 0;
        self.cycles = 0;
        self.opcode = 0;
        self.effective_address = 0;
        self.halted = false;
        debug!(target: "cpu", "reset complete");
    }

    pub fn memory(&self) -> &(dyn Memory + 'a) {
        &*self.memory
    }

    pub fn memory_mut(&mut self) -> &mut (dyn Memory + 'a) {
        &mut *self.memory
    }

    /// Cycles elapsed since reset. Wider than the 6502's 16 bits so the
    /// count never wraps back below an earlier value.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Opcode of the instruction most recently fetched.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Operand address computed for the most recent instruction.
    pub fn effective_address(&self) -> u16 {
        self.effective_address
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.status.is_set(flag)
    }

    pub fn set_flag(&mut self, flag: Flag) {
        self.status.set(flag);
    }

    pub fn clear_flag(&mut self, flag: Flag) {
        self.status.clear(flag);
    }

    /// Execute until BRK sets the halt flag.
    pub fn run(&mut self) -> Result<()> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    /// Fetch, decode and execute one instruction, returning the cycles it took.
    pub fn step(&mut self) -> Result<u8> {
        if self.halted {
            return Ok(0);
        }

        let pc = self.pc;
        self.opcode = self.memory.read(pc);
        self.pc = self.pc.wrapping_add(1);

        let Some(entry) = opcodes::decode(self.opcode) else {
            error!(target: "cpu", "illegal opcode 0x{:02X} at PC 0x{:04X}", self.opcode, pc);
            return Err(CpuError::IllegalOpcode { opcode: self.opcode, pc }.into());
        };

        let result = self.resolve(entry.mode);
        let extra = self.execute(entry.instruction, entry.mode);
        let cycles = entry.cycles + result.page_crossed as u8 + extra;
        self.cycles += cycles as u64;

        trace!(
            target: "instr",
            "{:04X} {:02X} {} {:?}+{} ea={:04X} cycles={}",
            pc,
            self.opcode,
            entry.instruction.mnemonic(),
            entry.mode,
            entry.mode.operand_bytes(),
            self.effective_address,
            cycles
        );

        if self.halted {
            debug!(target: "cpu", "halted at PC 0x{:04X} after {} cycles", self.pc, self.cycles);
        }

        Ok(cycles)
    }

    // Stack operations
    pub fn push(&mut self, value: u8) {
        let addr = STACK_BASE | self.sp as u16;
        self.memory.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = STACK_BASE | self.sp as u16;
        self.memory.read(addr)
    }

    fn operand(&self) -> u8 {
        self.memory.read(self.effective_address)
    }

    /// Runs `instruction` against the already-resolved effective address.
    /// Returns extra cycles charged by a taken branch.
    fn execute(&mut self, instruction: Instruction, mode: AddressingMode) -> u8 {
        use Instruction::*;

        match instruction {
            Brk => self.halted = true,

            Lda => {
                self.a = self.operand();
                self.status.update_zero_negative(self.a);
            }
            Ldx => {
                self.x = self.operand();
                self.status.update_zero_negative(self.x);
            }
            Ldy => {
                self.y = self.operand();
                self.status.update_zero_negative(self.y);
            }

            Sta => self.memory.write(self.effective_address, self.a),
            Stx => self.memory.write(self.effective_address, self.x),
            Sty => self.memory.write(self.effective_address, self.y),

            Tax => { self.x = self.a; self.status.update_zero_negative(self.x); }
            Tay => { self.y = self.a; self.status.update_zero_negative(self.y); }
            Tsx => { self.x = self.sp; self.status.update_zero_negative(self.x); }
            Txa => { self.a = self.x; self.status.update_zero_negative(self.a); }
            Txs => self.sp = self.x,
            Tya => { self.a = self.y; self.status.update_zero_negative(self.a); }

            Pha => self.push(self.a),
            Php => {
                // B and bit 5 appear set in the pushed copy only
                let status = self.status.as_byte() | Flag::Break.mask() | Flag::Ignored.mask();
                self.push(status);
            }
            Pla => {
                self.a = self.pop();
                self.status.update_zero_negative(self.a);
            }
            Plp => {
                let value = self.pop();
                self.status = StatusFlags::from_byte(value);
            }

            Inc => {
                let value = self.operand().wrapping_add(1);
                self.memory.write(self.effective_address, value);
                self.status.update_zero_negative(value);
            }
            Dec => {
                let value = self.operand().wrapping_sub(1);
                self.memory.write(self.effective_address, value);
                self.status.update_zero_negative(value);
            }
            Inx => { self.x = self.x.wrapping_add(1); self.status.update_zero_negative(self.x); }
            Iny => { self.y = self.y.wrapping_add(1); self.status.update_zero_negative(self.y); }
            Dex => { self.x = self.x.wrapping_sub(1); self.status.update_zero_negative(self.x); }
            Dey => { self.y = self.y.wrapping_sub(1); self.status.update_zero_negative(self.y); }

            Adc => {
                let value = self.operand();
                self.add_with_carry(value);
            }
            Sbc => {
                // A - M - (1 - C) == A + !M + C
                let value = self.operand();
                self.add_with_carry(!value);
            }

            And => { self.a &= self.operand(); self.status.update_zero_negative(self.a); }
            Eor => { self.a ^= self.operand(); self.status.update_zero_negative(self.a); }
            Ora => { self.a |= self.operand(); self.status.update_zero_negative(self.a); }

            Asl => self.shift(mode, |value| (value << 1, value & 0x80 != 0)),
            Lsr => self.shift(mode, |value| (value >> 1, value & 0x01 != 0)),

            Clc => self.status.clear(Flag::Carry),
            Cld => self.status.clear(Flag::Decimal),
            Cli => self.status.clear(Flag::InterruptDisable),
            Clv => self.status.clear(Flag::Overflow),
            Sec => self.status.set(Flag::Carry),
            Sed => self.status.set(Flag::Decimal),
            Sei => self.status.set(Flag::InterruptDisable),

            Cmp => self.compare(self.a),
            Cpx => self.compare(self.x),
            Cpy => self.compare(self.y),

            Bcc => return self.branch(!self.status.is_set(Flag::Carry)),
            Bcs => return self.branch(self.status.is_set(Flag::Carry)),
            Beq => return self.branch(self.status.is_set(Flag::Zero)),
            Bmi => return self.branch(self.status.is_set(Flag::Negative)),
            Bne => return self.branch(!self.status.is_set(Flag::Zero)),
            Bpl => return self.branch(!self.status.is_set(Flag::Negative)),
            Bvc => return self.branch(!self.status.is_set(Flag::Overflow)),
            Bvs => return self.branch(self.status.is_set(Flag::Overflow)),
        }

        0
    }

    fn add_with_carry(&mut self, value: u8) {
        let carry = self.status.is_set(Flag::Carry) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        // Both operands share a sign the result does not have
        let overflow = (!(self.a ^ value) & (self.a ^ result) & 0x80) != 0;

        self.status.assign(Flag::Carry, sum & 0x100 != 0);
        self.status.assign(Flag::Overflow, overflow);
        self.status.update_zero_negative(result);
        self.a = result;
    }

    /// ASL/LSR: `op` returns the shifted byte and the bit shifted out.
    fn shift(&mut self, mode: AddressingMode, op: impl Fn(u8) -> (u8, bool)) {
        let value = match mode {
            AddressingMode::Accumulator => self.a,
            _ => self.operand(),
        };

        let (result, carry) = op(value);
        self.status.assign(Flag::Carry, carry);
        self.status.update_zero_negative(result);

        match mode {
            AddressingMode::Accumulator => self.a = result,
            _ => self.memory.write(self.effective_address, result),
        }
    }

    fn compare(&mut self, register: u8) {
        let value = self.operand();
        let diff = register.wrapping_sub(value);
        self.status.assign(Flag::Carry, register >= value);
        self.status.assign(Flag::Zero, register == value);
        self.status.assign(Flag::Negative, diff & 0x80 != 0);
    }

    /// Consumes the offset byte whether or not the branch is taken.
    fn branch(&mut self, condition: bool) -> u8 {
        let offset = self.memory.read(self.pc) as i8;
        self.pc = self.pc.wrapping_add(1);

        if !condition {
            return 0;
        }

        let target = self.pc.wrapping_add(offset as u16);
        let page_crossed = (self.pc & 0xFF00) != (target & 0xFF00);
        self.pc = target;
        1 + page_crossed as u8
    }
}
