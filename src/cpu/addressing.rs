// Addressing modes for 6502

use crate::cpu::Cpu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Accumulator,
    Immediate,
    Implied,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
}

impl AddressingMode {
    /// Operand bytes the resolver consumes after the opcode.
    pub fn operand_bytes(self) -> u16 {
        match self {
            AddressingMode::Accumulator | AddressingMode::Implied | AddressingMode::Relative => 0,
            AddressingMode::Absolute | AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressResult {
    pub address: u16,
    pub page_crossed: bool,
}

impl AddressResult {
    fn at(address: u16) -> Self {
        Self { address, page_crossed: false }
    }
}

/// True when `index` carried out of the low byte of `base`.
fn crosses_page(base: u16, index: u8) -> bool {
    (base & 0x00FF) + index as u16 > 0xFF
}

impl Cpu<'_> {
    /// Compute the effective address for `mode`, moving PC past its operand.
    ///
    /// The address is also kept as the core's effective address so the
    /// instruction handler can use it. Register-only modes leave it at zero;
    /// relative mode does nothing because the branch handler reads its own
    /// offset.
    pub fn resolve(&mut self, mode: AddressingMode) -> AddressResult {
        let result = match mode {
            AddressingMode::Accumulator | AddressingMode::Implied | AddressingMode::Relative => {
                AddressResult::at(0)
            }
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                AddressResult::at(addr)
            }
            AddressingMode::ZeroPage => {
                let addr = self.fetch_byte() as u16;
                AddressResult::at(addr)
            }
            AddressingMode::ZeroPageX => {
                let base = self.fetch_byte();
                AddressResult::at(base.wrapping_add(self.x) as u16)
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch_byte();
                AddressResult::at(base.wrapping_add(self.y) as u16)
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word();
                AddressResult::at(addr)
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word();
                AddressResult {
                    address: base.wrapping_add(self.x as u16),
                    page_crossed: crosses_page(base, self.x),
                }
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word();
                AddressResult {
                    address: base.wrapping_add(self.y as u16),
                    page_crossed: crosses_page(base, self.y),
                }
            }
            AddressingMode::IndirectX => {
                let ptr = self.fetch_byte().wrapping_add(self.x);
                AddressResult::at(self.read_zero_page_word(ptr))
            }
            AddressingMode::IndirectY => {
                let ptr = self.fetch_byte();
                let base = self.read_zero_page_word(ptr);
                AddressResult {
                    address: base.wrapping_add(self.y as u16),
                    page_crossed: crosses_page(base, self.y),
                }
            }
        };

        self.effective_address = result.address;
        result
    }

    fn fetch_byte(&mut self) -> u8 {
        let value = self.memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    // Pointer high byte wraps within the zero page
    fn read_zero_page_word(&self, ptr: u8) -> u16 {
        let lo = self.memory.read(ptr as u16) as u16;
        let hi = self.memory.read(ptr.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressingMode, crosses_page};
    use crate::cpu::Cpu;
    use crate::memory::{BasicMemory, Memory};

    #[test]
    fn test_crosses_page_uses_low_byte_only() {
        assert!(!crosses_page(0x3120, 0x12));
        assert!(!crosses_page(0x31F0, 0x0F));
        assert!(crosses_page(0x31F0, 0x10));
        assert!(crosses_page(0xFFFF, 0x01));
    }

    #[test]
    fn test_immediate_points_at_operand() {
        let mut memory = BasicMemory::new();
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0201;

        let result = cpu.resolve(AddressingMode::Immediate);

        assert_eq!(result.address, 0x0201);
        assert_eq!(cpu.pc, 0x0202);
        assert_eq!(cpu.effective_address(), 0x0201);
    }

    #[test]
    fn test_register_modes_consume_nothing() {
        let mut memory = BasicMemory::new();
        let mut cpu = Cpu::new(&mut memory);

        for mode in [AddressingMode::Accumulator, AddressingMode::Implied, AddressingMode::Relative] {
            cpu.pc = 0x0300;
            let result = cpu.resolve(mode);
            assert_eq!(cpu.pc, 0x0300);
            assert!(!result.page_crossed);
            assert_eq!(mode.operand_bytes(), 0);
        }
    }

    #[test]
    fn test_zero_page_x_wraps() {
        let mut memory = BasicMemory::new();
        memory.write(0x0200, 0xF0);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;
        cpu.x = 0x20;

        let result = cpu.resolve(AddressingMode::ZeroPageX);

        assert_eq!(result.address, 0x0010);
        assert_eq!(cpu.pc, 0x0201);
    }

    #[test]
    fn test_absolute_y_page_cross() {
        let mut memory = BasicMemory::new();
        memory.load(0x0200, &[0xF0, 0x31]);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;
        cpu.y = 0x20;

        let result = cpu.resolve(AddressingMode::AbsoluteY);

        assert_eq!(result.address, 0x3210);
        assert!(result.page_crossed);
        assert_eq!(cpu.pc, 0x0202);
    }

    #[test]
    fn test_absolute_x_wraps_address_space() {
        let mut memory = BasicMemory::new();
        memory.load(0x0200, &[0xFF, 0xFF]);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;
        cpu.x = 0x02;

        let result = cpu.resolve(AddressingMode::AbsoluteX);

        assert_eq!(result.address, 0x0001);
        assert!(result.page_crossed);
    }

    #[test]
    fn test_indirect_x_pointer_wraps_in_zero_page() {
        let mut memory = BasicMemory::new();
        memory.write(0x0200, 0xFE);
        memory.write(0x00FF, 0x34);
        memory.write(0x0000, 0x12);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;
        cpu.x = 0x01;

        let result = cpu.resolve(AddressingMode::IndirectX);

        assert_eq!(result.address, 0x1234);
        assert!(!result.page_crossed);
    }

    #[test]
    fn test_indirect_y_pointer_wraps_in_zero_page() {
        let mut memory = BasicMemory::new();
        memory.write(0x0200, 0xFF);
        memory.write(0x00FF, 0x00);
        memory.write(0x0000, 0x30);
        memory.write(0x0100, 0x77);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;

        let result = cpu.resolve(AddressingMode::IndirectY);

        assert_eq!(result.address, 0x3000);
        assert!(!result.page_crossed);
    }

    #[test]
    fn test_indirect_y_page_cross() {
        let mut memory = BasicMemory::new();
        memory.write(0x0200, 0x70);
        memory.write(0x0070, 0xF8);
        memory.write(0x0071, 0x35);
        let mut cpu = Cpu::new(&mut memory);
        cpu.pc = 0x0200;
        cpu.y = 0x10;

        let result = cpu.resolve(AddressingMode::IndirectY);

        assert_eq!(result.address, 0x3608);
        assert!(result.page_crossed);
    }
}
