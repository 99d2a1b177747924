//! CO₂ emission intensity of consumed electricity.

quantity!(KilogramsPerKilowattHour, "kg/kWh");
quantity!(GramsPerKilowattHour, "g/kWh");

impl From<KilogramsPerKilowattHour> for GramsPerKilowattHour {
    fn from(value: KilogramsPerKilowattHour) -> Self {
        Self(value.0 * 1000.0)
    }
}

impl From<GramsPerKilowattHour> for KilogramsPerKilowattHour {
    fn from(value: GramsPerKilowattHour) -> Self {
        Self(value.0 * 0.001)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_kilograms_to_grams() {
        let grams = GramsPerKilowattHour::from(KilogramsPerKilowattHour(0.0452));
        assert_abs_diff_eq!(grams.0, 45.2, epsilon = 1e-9);
    }

    #[test]
    fn test_ordering_is_total() {
        assert!(GramsPerKilowattHour(45.2) < GramsPerKilowattHour(45.3));
        assert_eq!(GramsPerKilowattHour(0.0), GramsPerKilowattHour::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(KilogramsPerKilowattHour(0.25).to_string(), "0.25 kg/kWh");
        assert_eq!(format!("{:?}", GramsPerKilowattHour(250.0)), "250.0g/kWh");
    }

    #[test]
    fn test_from_str() -> anyhow::Result<()> {
        assert_eq!("0.125".parse::<KilogramsPerKilowattHour>()?, KilogramsPerKilowattHour(0.125));
        Ok(())
    }
}
