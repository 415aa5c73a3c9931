// 6502 instruction set: opcode dispatch table

use super::addressing::AddressingMode;

/// Every instruction the core can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Brk,
    Lda, Ldx, Ldy,
    Sta, Stx, Sty,
    Tax, Tay, Tsx, Txa, Txs, Tya,
    Pha, Php, Pla, Plp,
    Inc, Dec, Inx, Iny, Dex, Dey,
    Adc, Sbc,
    And, Eor, Ora,
    Asl, Lsr,
    Clc, Cld, Cli, Clv, Sec, Sed, Sei,
    Cmp, Cpx, Cpy,
    Bcc, Bcs, Beq, Bmi, Bne, Bpl, Bvc, Bvs,
}

impl Instruction {
    pub fn mnemonic(self) -> &'static str {
        use Instruction::*;

        match self {
            Brk => "BRK",
            Lda => "LDA", Ldx => "LDX", Ldy => "LDY",
            Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS", Tya => "TYA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP",
            Inc => "INC", Dec => "DEC", Inx => "INX", Iny => "INY", Dex => "DEX", Dey => "DEY",
            Adc => "ADC", Sbc => "SBC",
            And => "AND", Eor => "EOR", Ora => "ORA",
            Asl => "ASL", Lsr => "LSR",
            Clc => "CLC", Cld => "CLD", Cli => "CLI", Clv => "CLV",
            Sec => "SEC", Sed => "SED", Sei => "SEI",
            Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Bcc => "BCC", Bcs => "BCS", Beq => "BEQ", Bmi => "BMI",
            Bne => "BNE", Bpl => "BPL", Bvc => "BVC", Bvs => "BVS",
        }
    }
}

/// Dispatch entry: what to run, how to find its operand, and its base cost.
/// Page-cross and taken-branch penalties are added on top of `cycles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub instruction: Instruction,
    pub mode: AddressingMode,
    pub cycles: u8,
}

/// Indexed by opcode byte. `None` marks an illegal opcode (rotates, jumps,
/// BIT, NOP and the undocumented set are not supported).
pub static OPCODES: [Option<Opcode>; 256] = build_table();

pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

const fn op(instruction: Instruction, mode: AddressingMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode { instruction, mode, cycles })
}

const fn build_table() -> [Option<Opcode>; 256] {
    let mut table: [Option<Opcode>; 256] = [None; 256];

    // BRK - Force Break (halts the core)
    table[0x00] = op(Instruction::Brk, AddressingMode::Implied, 7);

    // LDA - Load Accumulator
    table[0xA9] = op(Instruction::Lda, AddressingMode::Immediate, 2);
    table[0xA5] = op(Instruction::Lda, AddressingMode::ZeroPage, 3);
    table[0xB5] = op(Instruction::Lda, AddressingMode::ZeroPageX, 4);
    table[0xAD] = op(Instruction::Lda, AddressingMode::Absolute, 4);
    table[0xBD] = op(Instruction::Lda, AddressingMode::AbsoluteX, 4);
    table[0xB9] = op(Instruction::Lda, AddressingMode::AbsoluteY, 4);
    table[0xA1] = op(Instruction::Lda, AddressingMode::IndirectX, 6);
    table[0xB1] = op(Instruction::Lda, AddressingMode::IndirectY, 5);

    // LDX - Load X Register
    table[0xA2] = op(Instruction::Ldx, AddressingMode::Immediate, 2);
    table[0xA6] = op(Instruction::Ldx, AddressingMode::ZeroPage, 3);
    table[0xB6] = op(Instruction::Ldx, AddressingMode::ZeroPageY, 4);
    table[0xAE] = op(Instruction::Ldx, AddressingMode::Absolute, 4);
    table[0xBE] = op(Instruction::Ldx, AddressingMode::AbsoluteY, 4);

    // LDY - Load Y Register
    table[0xA0] = op(Instruction::Ldy, AddressingMode::Immediate, 2);
    table[0xA4] = op(Instruction::Ldy, AddressingMode::ZeroPage, 3);
    table[0xB4] = op(Instruction::Ldy, AddressingMode::ZeroPageX, 4);
    table[0xAC] = op(Instruction::Ldy, AddressingMode::Absolute, 4);
    table[0xBC] = op(Instruction::Ldy, AddressingMode::AbsoluteX, 4);

    // STA - Store Accumulator
    table[0x85] = op(Instruction::Sta, AddressingMode::ZeroPage, 3);
    table[0x95] = op(Instruction::Sta, AddressingMode::ZeroPageX, 4);
    table[0x8D] = op(Instruction::Sta, AddressingMode::Absolute, 4);
    table[0x9D] = op(Instruction::Sta, AddressingMode::AbsoluteX, 5);
    table[0x99] = op(Instruction::Sta, AddressingMode::AbsoluteY, 5);
    table[0x81] = op(Instruction::Sta, AddressingMode::IndirectX, 6);
    table[0x91] = op(Instruction::Sta, AddressingMode::IndirectY, 6);

    // STX - Store X Register
    table[0x86] = op(Instruction::Stx, AddressingMode::ZeroPage, 3);
    table[0x96] = op(Instruction::Stx, AddressingMode::ZeroPageY, 4);
    table[0x8E] = op(Instruction::Stx, AddressingMode::Absolute, 4);

    // STY - Store Y Register
    table[0x84] = op(Instruction::Sty, AddressingMode::ZeroPage, 3);
    table[0x94] = op(Instruction::Sty, AddressingMode::ZeroPageX, 4);
    table[0x8C] = op(Instruction::Sty, AddressingMode::Absolute, 4);

    // Transfers
    table[0xAA] = op(Instruction::Tax, AddressingMode::Implied, 2);
    table[0xA8] = op(Instruction::Tay, AddressingMode::Implied, 2);
    table[0xBA] = op(Instruction::Tsx, AddressingMode::Implied, 2);
    table[0x8A] = op(Instruction::Txa, AddressingMode::Implied, 2);
    table[0x9A] = op(Instruction::Txs, AddressingMode::Implied, 2);
    table[0x98] = op(Instruction::Tya, AddressingMode::Implied, 2);

    // Stack
    table[0x48] = op(Instruction::Pha, AddressingMode::Implied, 3);
    table[0x08] = op(Instruction::Php, AddressingMode::Implied, 3);
    table[0x68] = op(Instruction::Pla, AddressingMode::Implied, 4);
    table[0x28] = op(Instruction::Plp, AddressingMode::Implied, 4);

    // DEC - Decrement Memory
    table[0xC6] = op(Instruction::Dec, AddressingMode::ZeroPage, 5);
    table[0xD6] = op(Instruction::Dec, AddressingMode::ZeroPageX, 6);
    table[0xCE] = op(Instruction::Dec, AddressingMode::Absolute, 6);
    table[0xDE] = op(Instruction::Dec, AddressingMode::AbsoluteX, 7);

    // INC - Increment Memory
    table[0xE6] = op(Instruction::Inc, AddressingMode::ZeroPage, 5);
    table[0xF6] = op(Instruction::Inc, AddressingMode::ZeroPageX, 6);
    table[0xEE] = op(Instruction::Inc, AddressingMode::Absolute, 6);
    table[0xFE] = op(Instruction::Inc, AddressingMode::AbsoluteX, 7);

    // INX, INY, DEX, DEY
    table[0xE8] = op(Instruction::Inx, AddressingMode::Implied, 2);
    table[0xC8] = op(Instruction::Iny, AddressingMode::Implied, 2);
    table[0xCA] = op(Instruction::Dex, AddressingMode::Implied, 2);
    table[0x88] = op(Instruction::Dey, AddressingMode::Implied, 2);

    // ADC - Add with Carry
    table[0x69] = op(Instruction::Adc, AddressingMode::Immediate, 2);
    table[0x65] = op(Instruction::Adc, AddressingMode::ZeroPage, 3);
    table[0x75] = op(Instruction::Adc, AddressingMode::ZeroPageX, 4);
    table[0x6D] = op(Instruction::Adc, AddressingMode::Absolute, 4);
    table[0x7D] = op(Instruction::Adc, AddressingMode::AbsoluteX, 4);
    table[0x79] = op(Instruction::Adc, AddressingMode::AbsoluteY, 4);
    table[0x61] = op(Instruction::Adc, AddressingMode::IndirectX, 6);
    table[0x71] = op(Instruction::Adc, AddressingMode::IndirectY, 5);

    // SBC - Subtract with Carry
    table[0xE9] = op(Instruction::Sbc, AddressingMode::Immediate, 2);
    table[0xE5] = op(Instruction::Sbc, AddressingMode::ZeroPage, 3);
    table[0xF5] = op(Instruction::Sbc, AddressingMode::ZeroPageX, 4);
    table[0xED] = op(Instruction::Sbc, AddressingMode::Absolute, 4);
    table[0xFD] = op(Instruction::Sbc, AddressingMode::AbsoluteX, 4);
    table[0xF9] = op(Instruction::Sbc, AddressingMode::AbsoluteY, 4);
    table[0xE1] = op(Instruction::Sbc, AddressingMode::IndirectX, 6);
    table[0xF1] = op(Instruction::Sbc, AddressingMode::IndirectY, 5);

    // AND - Logical AND
    table[0x29] = op(Instruction::And, AddressingMode::Immediate, 2);
    table[0x25] = op(Instruction::And, AddressingMode::ZeroPage, 3);
    table[0x35] = op(Instruction::And, AddressingMode::ZeroPageX, 4);
    table[0x2D] = op(Instruction::And, AddressingMode::Absolute, 4);
    table[0x3D] = op(Instruction::And, AddressingMode::AbsoluteX, 4);
    table[0x39] = op(Instruction::And, AddressingMode::AbsoluteY, 4);
    table[0x21] = op(Instruction::And, AddressingMode::IndirectX, 6);
    table[0x31] = op(Instruction::And, AddressingMode::IndirectY, 5);

    // EOR - Logical XOR
    table[0x49] = op(Instruction::Eor, AddressingMode::Immediate, 2);
    table[0x45] = op(Instruction::Eor, AddressingMode::ZeroPage, 3);
    table[0x55] = op(Instruction::Eor, AddressingMode::ZeroPageX, 4);
    table[0x4D] = op(Instruction::Eor, AddressingMode::Absolute, 4);
    table[0x5D] = op(Instruction::Eor, AddressingMode::AbsoluteX, 4);
    table[0x59] = op(Instruction::Eor, AddressingMode::AbsoluteY, 4);
    table[0x41] = op(Instruction::Eor, AddressingMode::IndirectX, 6);
    table[0x51] = op(Instruction::Eor, AddressingMode::IndirectY, 5);

    // ORA - Logical OR
    table[0x09] = op(Instruction::Ora, AddressingMode::Immediate, 2);
    table[0x05] = op(Instruction::Ora, AddressingMode::ZeroPage, 3);
    table[0x15] = op(Instruction::Ora, AddressingMode::ZeroPageX, 4);
    table[0x0D] = op(Instruction::Ora, AddressingMode::Absolute, 4);
    table[0x1D] = op(Instruction::Ora, AddressingMode::AbsoluteX, 4);
    table[0x19] = op(Instruction::Ora, AddressingMode::AbsoluteY, 4);
    table[0x01] = op(Instruction::Ora, AddressingMode::IndirectX, 6);
    table[0x11] = op(Instruction::Ora, AddressingMode::IndirectY, 5);

    // ASL - Arithmetic Shift Left
    table[0x0A] = op(Instruction::Asl, AddressingMode::Accumulator, 2);
    table[0x06] = op(Instruction::Asl, AddressingMode::ZeroPage, 5);
    table[0x16] = op(Instruction::Asl, AddressingMode::ZeroPageX, 6);
    table[0x0E] = op(Instruction::Asl, AddressingMode::Absolute, 6);
    table[0x1E] = op(Instruction::Asl, AddressingMode::AbsoluteX, 7);

    // LSR - Logical Shift Right
    table[0x4A] = op(Instruction::Lsr, AddressingMode::Accumulator, 2);
    table[0x46] = op(Instruction::Lsr, AddressingMode::ZeroPage, 5);
    table[0x56] = op(Instruction::Lsr, AddressingMode::ZeroPageX, 6);
    table[0x4E] = op(Instruction::Lsr, AddressingMode::Absolute, 6);
    table[0x5E] = op(Instruction::Lsr, AddressingMode::AbsoluteX, 7);

    // Flag instructions
    table[0x18] = op(Instruction::Clc, AddressingMode::Implied, 2);
    table[0xD8] = op(Instruction::Cld, AddressingMode::Implied, 2);
    table[0x58] = op(Instruction::Cli, AddressingMode::Implied, 2);
    table[0xB8] = op(Instruction::Clv, AddressingMode::Implied, 2);
    table[0x38] = op(Instruction::Sec, AddressingMode::Implied, 2);
    table[0xF8] = op(Instruction::Sed, AddressingMode::Implied, 2);
    table[0x78] = op(Instruction::Sei, AddressingMode::Implied, 2);

    // CMP - Compare Accumulator
    table[0xC9] = op(Instruction::Cmp, AddressingMode::Immediate, 2);
    table[0xC5] = op(Instruction::Cmp, AddressingMode::ZeroPage, 3);
    table[0xD5] = op(Instruction::Cmp, AddressingMode::ZeroPageX, 4);
    table[0xCD] = op(Instruction::Cmp, AddressingMode::Absolute, 4);
    table[0xDD] = op(Instruction::Cmp, AddressingMode::AbsoluteX, 4);
    table[0xD9] = op(Instruction::Cmp, AddressingMode::AbsoluteY, 4);
    table[0xC1] = op(Instruction::Cmp, AddressingMode::IndirectX, 6);
    table[0xD1] = op(Instruction::Cmp, AddressingMode::IndirectY, 5);

    // CPX - Compare X Register
    table[0xE0] = op(Instruction::Cpx, AddressingMode::Immediate, 2);
    table[0xE4] = op(Instruction::Cpx, AddressingMode::ZeroPage, 3);
    table[0xEC] = op(Instruction::Cpx, AddressingMode::Absolute, 4);

    // CPY - Compare Y Register
    table[0xC0] = op(Instruction::Cpy, AddressingMode::Immediate, 2);
    table[0xC4] = op(Instruction::Cpy, AddressingMode::ZeroPage, 3);
    table[0xCC] = op(Instruction::Cpy, AddressingMode::Absolute, 4);

    // Branches
    table[0x90] = op(Instruction::Bcc, AddressingMode::Relative, 2);
    table[0xB0] = op(Instruction::Bcs, AddressingMode::Relative, 2);
    table[0xF0] = op(Instruction::Beq, AddressingMode::Relative, 2);
    table[0x30] = op(Instruction::Bmi, AddressingMode::Relative, 2);
    table[0xD0] = op(Instruction::Bne, AddressingMode::Relative, 2);
    table[0x10] = op(Instruction::Bpl, AddressingMode::Relative, 2);
    table[0x50] = op(Instruction::Bvc, AddressingMode::Relative, 2);
    table[0x70] = op(Instruction::Bvs, AddressingMode::Relative, 2);

    table
}

#[cfg(test)]
mod tests {
    use super::{Instruction, OPCODES, decode};
    use crate::cpu::addressing::AddressingMode;

    #[test]
    fn test_supported_opcode_count() {
        assert_eq!(OPCODES.iter().flatten().count(), 133);
    }

    #[test]
    fn test_decode_lda_immediate() {
        let entry = decode(0xA9).unwrap();
        assert_eq!(entry.instruction, Instruction::Lda);
        assert_eq!(entry.mode, AddressingMode::Immediate);
        assert_eq!(entry.cycles, 2);
        assert_eq!(entry.instruction.mnemonic(), "LDA");
    }

    #[test]
    fn test_arithmetic_immediates_use_immediate_mode() {
        assert_eq!(decode(0x69).unwrap().mode, AddressingMode::Immediate);
        assert_eq!(decode(0xE9).unwrap().mode, AddressingMode::Immediate);
    }

    #[test]
    fn test_unsupported_opcodes_are_unmapped() {
        // ROL, ROR, JMP, JSR, RTS, RTI, BIT, NOP, and an undocumented opcode
        for opcode in [0x2A, 0x6A, 0x4C, 0x20, 0x60, 0x40, 0x24, 0xEA, 0x02] {
            assert!(decode(opcode).is_none(), "0x{:02X} should be unmapped", opcode);
        }
    }

    #[test]
    fn test_shift_accumulator_variants() {
        assert_eq!(decode(0x0A).unwrap().mode, AddressingMode::Accumulator);
        assert_eq!(decode(0x4A).unwrap().mode, AddressingMode::Accumulator);
    }

    #[test]
    fn test_branches_are_relative() {
        for opcode in [0x10, 0x30, 0x50, 0x70, 0x90, 0xB0, 0xD0, 0xF0] {
            let entry = decode(opcode).unwrap();
            assert_eq!(entry.mode, AddressingMode::Relative);
            assert_eq!(entry.cycles, 2);
        }
    }
}
