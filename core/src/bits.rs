/// A demodulated bit before framing has decided what to make of it.
///
/// The FSK demodulator emits `Unknown` when neither tone dominates a window;
/// every other demodulator only produces `Zero` and `One`. `Unknown` counts
/// as a mismatch during sync search and as 0 in the majority vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftBit {
    Zero,
    One,
    Unknown,
}

impl SoftBit {
    /// Bit decision from a correlator output: positive means 1.
    pub fn from_sign(x: f32) -> Self {
        if x > 0.0 {
            SoftBit::One
        } else {
            SoftBit::Zero
        }
    }

    /// Carrier-inversion recovery flips every decided bit.
    pub fn invert(self) -> Self {
        match self {
            SoftBit::Zero => SoftBit::One,
            SoftBit::One => SoftBit::Zero,
            SoftBit::Unknown => SoftBit::Unknown,
        }
    }

    /// Hard decision; an undecided bit collapses to 0.
    pub fn hard(self) -> u8 {
        match self {
            SoftBit::One => 1,
            _ => 0,
        }
    }

    /// Whether this stream bit agrees with an expected pattern bit.
    /// `Unknown` agrees with nothing.
    pub fn matches(self, expected: bool) -> bool {
        match self {
            SoftBit::One => expected,
            SoftBit::Zero => !expected,
            SoftBit::Unknown => false,
        }
    }
}

/// 2-of-3 majority vote over one bit position of the three payload copies.
pub fn majority(a: SoftBit, b: SoftBit, c: SoftBit) -> u8 {
    if a.hard() + b.hard() + c.hard() >= 2 {
        1
    } else {
        0
    }
}
