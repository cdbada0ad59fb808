//! Self-describing parameter types for generated documentation.
//!
//! Every type that can be coerced from a request parameter can describe
//! itself through [`TypeDoc`]; the router records these descriptions and
//! [`crate::docs::ApiDocs`] surfaces them verbatim.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, Error as DeError, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A human readable description of a parameter type.
pub trait TypeDoc {
    fn type_doc() -> &'static str;
}

macro_rules! impl_type_doc {
    ($doc:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl TypeDoc for $ty {
                fn type_doc() -> &'static str {
                    $doc
                }
            }
        )+
    };
}

impl_type_doc!("A whole number" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_type_doc!("A decimal number" => f32, f64);
impl_type_doc!("Basic text / string value" => String, &str);
impl_type_doc!("Providing any value will set this to true" => bool);

impl<T> TypeDoc for Vec<T> {
    fn type_doc() -> &'static str {
        "Multiple Values"
    }
}

impl<T: TypeDoc> TypeDoc for Option<T> {
    fn type_doc() -> &'static str {
        T::type_doc()
    }
}

/// A list of values transported as a single comma separated string.
///
/// `tags=a,b,c` deserializes to `CommaSeparated(vec!["a", "b", "c"])`
/// with element-wise coercion through `T`'s `FromStr`-style string
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommaSeparated<T>(pub Vec<T>);

impl<T> TypeDoc for CommaSeparated<T> {
    fn type_doc() -> &'static str {
        "Multiple values, separated by a comma"
    }
}

impl<T> CommaSeparated<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> IntoIterator for CommaSeparated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de, T> Deserialize<'de> for CommaSeparated<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CommaVisitor<T>(std::marker::PhantomData<T>);

        impl<T> Visitor<'_> for CommaVisitor<T>
        where
            T: FromStr,
            T::Err: fmt::Display,
        {
            type Value = CommaSeparated<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a comma separated string")
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                if value.is_empty() {
                    return Ok(CommaSeparated(Vec::new()));
                }
                value
                    .split(',')
                    .map(|part| part.parse::<T>().map_err(E::custom))
                    .collect::<Result<Vec<_>, _>>()
                    .map(CommaSeparated)
            }
        }

        deserializer.deserialize_str(CommaVisitor(std::marker::PhantomData))
    }
}

impl<T: Serialize> Serialize for CommaSeparated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{CommaSeparated, TypeDoc};

    #[test]
    fn builtin_type_docs() {
        assert_eq!(u32::type_doc(), "A whole number");
        assert_eq!(f64::type_doc(), "A decimal number");
        assert_eq!(String::type_doc(), "Basic text / string value");
        assert_eq!(Vec::<String>::type_doc(), "Multiple Values");
        assert_eq!(Option::<i64>::type_doc(), "A whole number");
        assert_eq!(CommaSeparated::<String>::type_doc(), "Multiple values, separated by a comma");
    }

    #[derive(Deserialize)]
    struct Params {
        tags: CommaSeparated<String>,
    }

    #[test]
    fn comma_separated_splits_query_values() {
        let params: Params = serde_qs::from_str("tags=red,green,blue").unwrap();
        assert_eq!(params.tags.0, vec!["red", "green", "blue"]);
    }

    #[derive(Deserialize)]
    struct NumberParams {
        ids: CommaSeparated<u32>,
    }

    #[test]
    fn comma_separated_coerces_elements() {
        let params: NumberParams = serde_qs::from_str("ids=1,2,3").unwrap();
        assert_eq!(params.ids.0, vec![1, 2, 3]);

        assert!(serde_qs::from_str::<NumberParams>("ids=1,zwei,3").is_err());
    }

    #[test]
    fn comma_separated_empty_string_is_empty_list() {
        let params: Params = serde_qs::from_str("tags=").unwrap();
        assert!(params.tags.0.is_empty());
    }
}
