pub fn unsigned_short(values: &[u8], offset: usize) -> u16 {
    let v0 = values[offset] as u16;
    let v1 = values[offset + 1] as u16;
    v0 + (v1 << 8)
}

pub fn signed_short(values: &[u8], offset: usize) -> i16 {
    unsigned_short(values, offset) as i16
}

/// Sign-extends the low 12 bits of `value`.
pub fn signed_12bit(value: u16) -> i16 {
    ((value << 4) as i16) >> 4
}

/// Joins msb, lsb and the upper nibble of xlsb into a 20-bit ADC count.
pub fn adc_20bit(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
}
