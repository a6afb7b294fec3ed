/// One report line: "Total" or a single service, with its summed charge.
#[derive(Debug, PartialEq)]
pub struct EstimatedCharge {
    pub label: String,
    pub amount: f64,
}

impl EstimatedCharge {
    pub fn new(label: &str, amount: f64) -> Self {
        EstimatedCharge {
            label: label.to_string(),
            amount,
        }
    }

    pub fn to_field_value(&self) -> String {
        format!("{:.6} USD", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use crate::metric::EstimatedCharge;

    #[test]
    fn test_to_field_value() {
        let charge = EstimatedCharge::new("Total", 12.5);
        assert_eq!(charge.to_field_value(), "12.500000 USD");
    }

    #[test]
    fn test_to_field_value_zero() {
        let charge = EstimatedCharge::new("AmazonS3", 0.0);
        assert_eq!(charge.to_field_value(), "0.000000 USD");
    }
}
