//! The arithmetic unit.
//!
//! Every operation is computed as a 33-bit quantity; bit 32 of the
//! intermediate value becomes the carry output.  For the shifts, the
//! operation places the bit which it evicts into bit 32.
use base::prelude::AluOp;
use serde::Serialize;

/// The outputs of one ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AluOutput {
    pub result: u32,
    pub carry: bool,
    pub zero: bool,
    pub negative: bool,
}

fn bit(value: u32, n: u32) -> u64 {
    u64::from((value >> n) & 1)
}

/// Compute `op` on operands `a` and `b`.  Unary operations (`not`
/// and the shifts) use only `a`.
pub fn apply(op: AluOp, a: u32, b: u32, carry_in: bool) -> AluOutput {
    let (a64, b64, cin) = (u64::from(a), u64::from(b), u64::from(carry_in));
    let wide: u64 = match op {
        AluOp::Add => a64 + b64,
        AluOp::Sub => a64.wrapping_sub(b64),
        AluOp::Adc => a64 + b64 + cin,
        AluOp::Sbc => a64.wrapping_sub(b64).wrapping_sub(cin),
        AluOp::Not => u64::from(!a),
        AluOp::And => u64::from(a & b),
        AluOp::Or => u64::from(a | b),
        AluOp::Xor => u64::from(a ^ b),
        AluOp::Shl => a64 << 1,
        AluOp::Shr => (a64 >> 1) | (bit(a, 0) << 32),
        AluOp::Asl => (a64 << 1) | cin,
        AluOp::Asr => (a64 >> 1) | (cin << 31) | (bit(a, 0) << 32),
        AluOp::Sl4 => (a64 << 4) & 0x1_FFFF_FFFF,
        AluOp::Sl16 => (a64 << 16) & 0x1_FFFF_FFFF,
        AluOp::Sr4 => (a64 >> 4) | (bit(a, 3) << 32),
        AluOp::Sr16 => (a64 >> 16) | (bit(a, 15) << 32),
    };
    let result = wide as u32;
    AluOutput {
        result,
        carry: (wide >> 32) & 1 != 0,
        zero: result == 0,
        negative: result & (1 << 31) != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn run(op: AluOp, a: u32, b: u32) -> AluOutput {
        apply(op, a, b, false)
    }

    #[test]
    fn test_add() {
        assert_eq!(
            run(AluOp::Add, 5, 3),
            AluOutput {
                result: 8,
                carry: false,
                zero: false,
                negative: false
            }
        );
        let out = run(AluOp::Add, 0xFFFF_FFFF, 1);
        assert_eq!(out.result, 0);
        assert!(out.carry);
        assert!(out.zero);
    }

    #[test]
    fn test_sub_borrows() {
        let out = run(AluOp::Sub, 3, 5);
        assert_eq!(out.result, 0xFFFF_FFFE);
        assert!(out.negative);
        assert!(!out.zero);
        assert!(out.carry);
        assert!(!run(AluOp::Sub, 5, 3).carry);
    }

    #[test]
    fn test_with_carry() {
        assert_eq!(apply(AluOp::Adc, 1, 1, true).result, 3);
        assert_eq!(apply(AluOp::Sbc, 5, 1, true).result, 3);
        let out = apply(AluOp::Sbc, 0, 0, true);
        assert_eq!(out.result, 0xFFFF_FFFF);
        assert!(out.carry);
    }

    #[test]
    fn test_logic() {
        assert_eq!(run(AluOp::And, 0xFF00, 0x0FF0).result, 0x0F00);
        assert_eq!(run(AluOp::Or, 0xFF00, 0x0FF0).result, 0xFFF0);
        assert_eq!(run(AluOp::Xor, 0xFF00, 0x0FF0).result, 0xF0F0);
        let out = run(AluOp::Not, 0, 0x1234);
        assert_eq!(out.result, 0xFFFF_FFFF);
        assert!(!out.carry);
        assert!(out.negative);
    }

    #[test]
    fn test_shl_evicts_top_bit() {
        let out = run(AluOp::Shl, 0x8000_0000, 0);
        assert_eq!(out.result, 0);
        assert!(out.carry);
        assert!(out.zero);
    }

    #[test]
    fn test_shr_evicts_bottom_bit() {
        let out = run(AluOp::Shr, 0x8000_0003, 0);
        assert_eq!(out.result, 0x4000_0001);
        assert!(out.carry);
        assert!(!run(AluOp::Shr, 2, 0).carry);
    }

    #[test]
    fn test_asl_and_asr_shift_in_carry() {
        let out = apply(AluOp::Asl, 0x8000_0000, 0, true);
        assert_eq!(out.result, 1);
        assert!(out.carry);
        let out = apply(AluOp::Asr, 0x0000_0003, 0, true);
        assert_eq!(out.result, 0x8000_0001);
        assert!(out.carry);
        let out = apply(AluOp::Asr, 0x0000_0002, 0, false);
        assert_eq!(out.result, 1);
        assert!(!out.carry);
    }

    #[test]
    fn test_multi_bit_shifts() {
        let out = run(AluOp::Sl4, 0x1000_0001, 0);
        assert_eq!(out.result, 0x0000_0010);
        assert!(out.carry);
        let out = run(AluOp::Sl16, 0x0001_ABCD, 0);
        assert_eq!(out.result, 0xABCD_0000);
        assert!(out.carry);
        let out = run(AluOp::Sr4, 0x0000_0018, 0);
        assert_eq!(out.result, 1);
        assert!(out.carry);
        let out = run(AluOp::Sr16, 0x1234_8000, 0);
        assert_eq!(out.result, 0x1234);
        assert!(out.carry);
        assert!(!run(AluOp::Sr16, 0x1234_7FFF, 0).carry);
    }

    #[proptest]
    fn flags_follow_result(op_number: u8, a: u32, b: u32, carry_in: bool) {
        let op = AluOp::ALL[usize::from(op_number % 16)];
        let out = apply(op, a, b, carry_in);
        assert_eq!(out.zero, out.result == 0);
        assert_eq!(out.negative, (out.result as i32) < 0);
    }

    #[proptest]
    fn add_then_sub_is_identity(a: u32, b: u32) {
        let sum = run(AluOp::Add, a, b);
        assert_eq!(run(AluOp::Sub, sum.result, b).result, a);
        assert_eq!(sum.carry, a.checked_add(b).is_none());
    }
}
