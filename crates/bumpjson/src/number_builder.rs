//! Decimal-to-double conversion without library float parsing.
//!
//! A number token is accumulated as three machine integers (integer part,
//! fractional digits, exponent) plus two signs. Accumulators saturate: once
//! the next digit would overflow, the accumulator clamps to a sentinel and
//! every later digit is dropped.
//!
//! Conversion folds the fraction into a single decimal significand when it
//! fits in 64 bits and scales it by correctly rounded powers of ten, so the
//! extremes of the `f64` range (`1.7976931348623157e308`,
//! `2.2250738585072014e-308`) convert exactly. Other values may land one or
//! two units in the last place away from the nearest double.
//!
//! # Saturation policy
//!
//! A saturated integer or fractional part, an exponent above
//! [`MAX_EXPONENT`], or a magnitude that leaves the finite `f64` range all
//! produce a zero carrying the number's sign instead of an error: `1e400`
//! parses as `0.0` and `-1e400` as `-0.0`.

/// Largest decimal exponent that can still yield a finite result.
pub(crate) const MAX_EXPONENT: u32 = 308;

const SATURATED: u64 = u64::MAX;

/// `10^0` through `10^308`, each the nearest `f64`.
const POWERS: [f64; MAX_EXPONENT as usize + 1] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22, 1e23, 1e24, 1e25, 1e26, 1e27, 1e28, 1e29, 1e30, 1e31, 1e32,
    1e33, 1e34, 1e35, 1e36, 1e37, 1e38, 1e39, 1e40, 1e41, 1e42, 1e43, 1e44, 1e45, 1e46, 1e47, 1e48,
    1e49, 1e50, 1e51, 1e52, 1e53, 1e54, 1e55, 1e56, 1e57, 1e58, 1e59, 1e60, 1e61, 1e62, 1e63, 1e64,
    1e65, 1e66, 1e67, 1e68, 1e69, 1e70, 1e71, 1e72, 1e73, 1e74, 1e75, 1e76, 1e77, 1e78, 1e79, 1e80,
    1e81, 1e82, 1e83, 1e84, 1e85, 1e86, 1e87, 1e88, 1e89, 1e90, 1e91, 1e92, 1e93, 1e94, 1e95, 1e96,
    1e97, 1e98, 1e99, 1e100, 1e101, 1e102, 1e103, 1e104, 1e105, 1e106, 1e107, 1e108, 1e109, 1e110,
    1e111, 1e112, 1e113, 1e114, 1e115, 1e116, 1e117, 1e118, 1e119, 1e120, 1e121, 1e122, 1e123,
    1e124, 1e125, 1e126, 1e127, 1e128, 1e129, 1e130, 1e131, 1e132, 1e133, 1e134, 1e135, 1e136,
    1e137, 1e138, 1e139, 1e140, 1e141, 1e142, 1e143, 1e144, 1e145, 1e146, 1e147, 1e148, 1e149,
    1e150, 1e151, 1e152, 1e153, 1e154, 1e155, 1e156, 1e157, 1e158, 1e159, 1e160, 1e161, 1e162,
    1e163, 1e164, 1e165, 1e166, 1e167, 1e168, 1e169, 1e170, 1e171, 1e172, 1e173, 1e174, 1e175,
    1e176, 1e177, 1e178, 1e179, 1e180, 1e181, 1e182, 1e183, 1e184, 1e185, 1e186, 1e187, 1e188,
    1e189, 1e190, 1e191, 1e192, 1e193, 1e194, 1e195, 1e196, 1e197, 1e198, 1e199, 1e200, 1e201,
    1e202, 1e203, 1e204, 1e205, 1e206, 1e207, 1e208, 1e209, 1e210, 1e211, 1e212, 1e213, 1e214,
    1e215, 1e216, 1e217, 1e218, 1e219, 1e220, 1e221, 1e222, 1e223, 1e224, 1e225, 1e226, 1e227,
    1e228, 1e229, 1e230, 1e231, 1e232, 1e233, 1e234, 1e235, 1e236, 1e237, 1e238, 1e239, 1e240,
    1e241, 1e242, 1e243, 1e244, 1e245, 1e246, 1e247, 1e248, 1e249, 1e250, 1e251, 1e252, 1e253,
    1e254, 1e255, 1e256, 1e257, 1e258, 1e259, 1e260, 1e261, 1e262, 1e263, 1e264, 1e265, 1e266,
    1e267, 1e268, 1e269, 1e270, 1e271, 1e272, 1e273, 1e274, 1e275, 1e276, 1e277, 1e278, 1e279,
    1e280, 1e281, 1e282, 1e283, 1e284, 1e285, 1e286, 1e287, 1e288, 1e289, 1e290, 1e291, 1e292,
    1e293, 1e294, 1e295, 1e296, 1e297, 1e298, 1e299, 1e300, 1e301, 1e302, 1e303, 1e304, 1e305,
    1e306, 1e307, 1e308,
];

/// `10^n` for `n <= 308`.
#[must_use]
#[inline]
pub(crate) fn pow10(n: u32) -> Option<f64> {
    POWERS.get(n as usize).copied()
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NumberBuilder {
    negative: bool,
    exponent_negative: bool,
    integer: u64,
    decimal: u64,
    decimal_digits: u32,
    exponent: u32,
    has_digits: bool,
}

#[inline]
fn accumulate(acc: u64, digit: u8) -> u64 {
    debug_assert!(digit.is_ascii_digit());
    if acc == SATURATED {
        return SATURATED;
    }
    acc.checked_mul(10)
        .and_then(|v| v.checked_add(u64::from(digit - b'0')))
        .filter(|v| *v != SATURATED)
        .unwrap_or(SATURATED)
}

impl NumberBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether at least one digit has been seen.
    pub(crate) fn has_digits(&self) -> bool {
        self.has_digits
    }

    pub(crate) fn set_negative(&mut self) {
        self.negative = true;
    }

    pub(crate) fn set_exponent_negative(&mut self) {
        self.exponent_negative = true;
    }

    pub(crate) fn push_integer(&mut self, digit: u8) {
        self.has_digits = true;
        self.integer = accumulate(self.integer, digit);
    }

    pub(crate) fn push_decimal(&mut self, digit: u8) {
        self.has_digits = true;
        self.decimal = accumulate(self.decimal, digit);
        if self.decimal != SATURATED {
            self.decimal_digits += 1;
        }
    }

    pub(crate) fn push_exponent(&mut self, digit: u8) {
        self.has_digits = true;
        self.exponent = u32::try_from(accumulate(u64::from(self.exponent), digit))
            .unwrap_or(u32::MAX);
    }

    /// `sign · (integer + decimal / 10^digits) · 10^(±exponent)`, or a signed
    /// zero under the saturation policy.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn to_f64(&self) -> f64 {
        if self.integer == SATURATED || self.decimal == SATURATED || self.exponent > MAX_EXPONENT {
            return self.signed(0.0);
        }

        let exponent = if self.exponent_negative {
            -i64::from(self.exponent)
        } else {
            i64::from(self.exponent)
        };
        let folded = 10u64
            .checked_pow(self.decimal_digits)
            .and_then(|power| self.integer.checked_mul(power))
            .and_then(|whole| whole.checked_add(self.decimal));
        let (significand, exponent) = match (folded, pow10(self.decimal_digits)) {
            (Some(folded), _) => (folded as f64, exponent - i64::from(self.decimal_digits)),
            (None, Some(power)) => (self.integer as f64 + self.decimal as f64 / power, exponent),
            (None, None) => return self.signed(0.0),
        };

        let magnitude = scale(significand, exponent);
        if magnitude.is_finite() {
            self.signed(magnitude)
        } else {
            self.signed(0.0)
        }
    }

    #[inline]
    fn signed(&self, magnitude: f64) -> f64 {
        if self.negative { -magnitude } else { magnitude }
    }
}

/// `value · 10^exponent`. Negative exponents divide, splitting at `10^308`
/// when the divisor alone would not fit.
fn scale(value: f64, exponent: i64) -> f64 {
    let Ok(magnitude) = u32::try_from(exponent.unsigned_abs()) else {
        return 0.0;
    };
    if exponent >= 0 {
        return pow10(magnitude).map_or(f64::INFINITY, |power| value * power);
    }
    match pow10(magnitude) {
        Some(power) => value / power,
        None => pow10(magnitude - MAX_EXPONENT)
            .map_or(0.0, |rest| value / POWERS[MAX_EXPONENT as usize] / rest),
    }
}
