//! Broadcast date and time decoding.
//!
//! EIT start times are carried as a 16-bit Modified Julian Date day count
//! followed by three binary-coded-decimal bytes of wall-clock time;
//! durations are three BCD bytes. The wall clock is taken as UTC verbatim,
//! with no timezone correction.

/// Decode a binary-coded-decimal byte: each nibble is one decimal digit.
pub fn bcd(value: u8) -> u32 {
    let h = (value >> 4) as u32;
    let l = (value & 0x0F) as u32;
    h * 10 + l
}

/// Convert an MJD day count to a `(year, month, day)` tuple.
///
/// Standard conversion from ETSI EN 300 468 annex C.
pub fn mjd_to_ymd(mjd: u16) -> (i32, u32, u32) {
    let mjd = mjd as f64;
    let yd = ((mjd - 15078.2) / 365.25).floor();
    let md = ((mjd - 14956.1 - (yd * 365.25).floor()) / 30.6001).floor();
    let d = mjd - 14956.0 - (yd * 365.25).floor() - (md * 30.6001).floor();
    let k = if md == 14.0 || md == 15.0 { 1.0 } else { 0.0 };
    let y = 1900.0 + yd + k;
    let m = md - 1.0 - k * 12.0;
    (y as i32, m as u32, d as u32)
}

/// Days from the Unix epoch to the given proleptic-Gregorian civil date.
fn days_from_civil(y: i32, m: u32, d: u32) -> i64 {
    let y = y as i64 - if m <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 } as i64;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Build a UTC timestamp from an MJD day count and BCD time-of-day bytes.
///
/// Out-of-range BCD fields roll over into the following days instead of
/// failing, so the conversion is total over arbitrary input bytes.
pub fn start_timestamp(mjd: u16, hour: u8, minute: u8, second: u8) -> i64 {
    let (y, m, d) = mjd_to_ymd(mjd);
    days_from_civil(y, m, d) * 86_400
        + bcd(hour) as i64 * 3600
        + bcd(minute) as i64 * 60
        + bcd(second) as i64
}

/// Decode a BCD hour/minute/second duration into seconds.
pub fn duration_seconds(hour: u8, minute: u8, second: u8) -> u32 {
    bcd(hour) * 3600 + bcd(minute) * 60 + bcd(second)
}
