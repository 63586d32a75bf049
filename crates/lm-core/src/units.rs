// lm-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, ElectricCharge as UomElectricCharge,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Charge = UomElectricCharge;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

/// Decimal SI prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiPrefix {
    pub symbol: &'static str,
    /// Power of ten, always a multiple of 3.
    pub exponent: i32,
}

impl SiPrefix {
    pub const NONE: SiPrefix = SiPrefix {
        symbol: "",
        exponent: 0,
    };

    pub fn factor(self) -> f64 {
        10f64.powi(self.exponent)
    }
}

const PREFIXES: [SiPrefix; 17] = [
    SiPrefix { symbol: "y", exponent: -24 },
    SiPrefix { symbol: "z", exponent: -21 },
    SiPrefix { symbol: "a", exponent: -18 },
    SiPrefix { symbol: "f", exponent: -15 },
    SiPrefix { symbol: "p", exponent: -12 },
    SiPrefix { symbol: "n", exponent: -9 },
    SiPrefix { symbol: "µ", exponent: -6 },
    SiPrefix { symbol: "m", exponent: -3 },
    SiPrefix::NONE,
    SiPrefix { symbol: "k", exponent: 3 },
    SiPrefix { symbol: "M", exponent: 6 },
    SiPrefix { symbol: "G", exponent: 9 },
    SiPrefix { symbol: "T", exponent: 12 },
    SiPrefix { symbol: "P", exponent: 15 },
    SiPrefix { symbol: "E", exponent: 18 },
    SiPrefix { symbol: "Z", exponent: 21 },
    SiPrefix { symbol: "Y", exponent: 24 },
];

/// Engineering prefix for a value, so that the scaled value lies in `[1, 1000)`.
///
/// Zero and non-finite values get no prefix; magnitudes outside the table
/// clamp to `y` / `Y`.
pub fn si_prefix_for(value: f64) -> SiPrefix {
    let Some(exp) = crate::numeric::decimal_exponent(value) else {
        return SiPrefix::NONE;
    };
    let eng = exp.div_euclid(3) * 3;
    let clamped = eng.clamp(-24, 24);
    PREFIXES
        .iter()
        .copied()
        .find(|p| p.exponent == clamped)
        .unwrap_or(SiPrefix::NONE)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn coulomb(v: f64) -> Charge {
    use uom::si::electric_charge::coulomb;
    Charge::new::<coulomb>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Physical constants with their standard uncertainties (CODATA 2014).
pub mod constants {
    use super::*;
    use crate::uncertainty::{Measurement, Uncertainty};

    const fn known(value: f64, sigma: f64) -> Measurement {
        Measurement {
            value,
            uncertainty: Uncertainty::Known(sigma),
        }
    }

    /// Speed of light in vacuum, m/s (exact).
    pub const SPEED_OF_LIGHT: Measurement = Measurement::exact(2.997_924_58e8);
    /// Planck constant, J·s.
    pub const PLANCK: Measurement = known(6.626_070_040e-34, 8.1e-42);
    /// Elementary charge, C.
    pub const ELEMENTARY_CHARGE: Measurement = known(1.602_176_620_8e-19, 9.8e-28);
    /// Local gravitational acceleration in Heidelberg, m/s².
    pub const GRAVITY_HEIDELBERG: Measurement = known(9.809_84, 2e-5);
    /// 0 °C in kelvin (exact).
    pub const ZERO_CELSIUS: Measurement = Measurement::exact(273.15);

    #[inline]
    pub fn c() -> Velocity {
        mps(SPEED_OF_LIGHT.value)
    }

    #[inline]
    pub fn e() -> Charge {
        coulomb(ELEMENTARY_CHARGE.value)
    }

    #[inline]
    pub fn g_heidelberg() -> Accel {
        mps2(GRAVITY_HEIDELBERG.value)
    }

    #[inline]
    pub fn t0() -> Temperature {
        k(ZERO_CELSIUS.value)
    }
}
