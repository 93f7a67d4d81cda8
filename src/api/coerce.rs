use crate::errors::DecodeError;
use crate::response::FlatResponse;

/// A status field type that can be decoded from its wire text.
pub(crate) trait StatusValue: Sized {
    fn decode(key: &'static str, raw: &str) -> Result<Self, DecodeError>;
}

impl StatusValue for String {
    fn decode(_key: &'static str, raw: &str) -> Result<Self, DecodeError> {
        Ok(raw.to_owned())
    }
}

impl StatusValue for bool {
    /// Only `true` in any casing is true; any other text is false.
    fn decode(_key: &'static str, raw: &str) -> Result<Self, DecodeError> {
        Ok(raw.eq_ignore_ascii_case("true"))
    }
}

macro_rules! simple_status_value {
    ($($ty:ty),*) => {
        $(
            impl StatusValue for $ty {
                fn decode(key: &'static str, raw: &str) -> Result<Self, DecodeError> {
                    raw.trim().parse().map_err(|err| DecodeError::InvalidValue {
                        key,
                        value: raw.to_owned(),
                        reason: format!("{err}"),
                    })
                }
            }
        )*
    };
}

simple_status_value!(f64, i32, u32);

impl FlatResponse {
    /// Decode a required field.
    pub(crate) fn field<T: StatusValue>(&self, key: &'static str) -> Result<T, DecodeError> {
        T::decode(key, self.require(key)?)
    }

    /// Decode a field that may be absent.
    pub(crate) fn optional_field<T: StatusValue>(
        &self,
        key: &'static str,
    ) -> Result<Option<T>, DecodeError> {
        self.get(key).map(|raw| T::decode(key, raw)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_true_is_case_insensitive() {
        for raw in ["TRUE", "true", "True", "tRuE"] {
            assert!(bool::decode("k", raw).unwrap(), "{raw}");
        }
    }

    #[test]
    fn anything_else_is_false() {
        for raw in ["false", "0", "", "1", "yes", " true"] {
            assert!(!bool::decode("k", raw).unwrap(), "{raw:?}");
        }
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert_eq!(
            f64::decode("site.latitude_degs", "north"),
            Err(DecodeError::InvalidValue {
                key: "site.latitude_degs",
                value: "north".to_owned(),
                reason: "invalid float literal".to_owned(),
            })
        );
        assert!(i32::decode("m3.port", "1.5").is_err());
        assert!(u32::decode("mount.model.num_points_total", "-1").is_err());
        assert!(f64::decode("k", "").is_err());
    }

    #[test]
    fn numbers_tolerate_surrounding_whitespace() {
        assert_eq!(f64::decode("k", " -12.5 ").unwrap(), -12.5);
        assert_eq!(i32::decode("k", "3").unwrap(), 3);
    }

    #[test]
    fn optional_fields() {
        let flat = FlatResponse::parse("pwi4.version=4.0.99");
        assert_eq!(
            flat.optional_field::<String>("pwi4.version").unwrap(),
            Some("4.0.99".to_owned())
        );
        assert_eq!(flat.optional_field::<f64>("absent").unwrap(), None);
    }
}
