//! Base64 helpers and query string construction.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in query keys and values. Matches what browsers' `encodeURIComponent` leaves unescaped, so
/// spaces become `%20` instead of `+`.
const QUERY_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encodes bytes as standard, padded base64.
pub fn base64_encode<T>(input: T) -> String
where
    T: AsRef<[u8]>,
{
    STANDARD.encode(input)
}

/// Encodes bytes as unpadded base64url.
pub fn base64url_encode<T>(input: T) -> String
where
    T: AsRef<[u8]>,
{
    URL_SAFE_NO_PAD.encode(input)
}

/// Turns a standard base64 string into its base64url form: padding stripped, `+` replaced with `-` and `/` replaced
/// with `_`.
pub fn escape_base64url(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Percent-encodes a single query string component.
pub fn encode_query_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_COMPONENT_SET).to_string()
}

/// A value that can be put in a query string. Returning `None` leaves the parameter out entirely.
pub trait ToQueryValue {
    fn to_query_value(&self) -> Option<String>;
}

impl ToQueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl ToQueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ToQueryValue for bool {
    fn to_query_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

macro_rules! impl_to_query_value_for_number {
    ($($ty:ty),*) => {
        $(
            impl ToQueryValue for $ty {
                fn to_query_value(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_to_query_value_for_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl<T> ToQueryValue for Option<T>
where
    T: ToQueryValue,
{
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(ToQueryValue::to_query_value)
    }
}

// lists are joined with commas, the same way Spotify expects lists of IDs
impl<T> ToQueryValue for [T]
where
    T: ToQueryValue,
{
    fn to_query_value(&self) -> Option<String> {
        Some(
            self.iter()
                .filter_map(ToQueryValue::to_query_value)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl<T> ToQueryValue for Vec<T>
where
    T: ToQueryValue,
{
    fn to_query_value(&self) -> Option<String> {
        self.as_slice().to_query_value()
    }
}

impl<T> ToQueryValue for &T
where
    T: ToQueryValue + ?Sized,
{
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

/// An ordered set of query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Values that are `None` are skipped.
    pub fn insert<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToQueryValue,
    {
        if let Some(value) = value.to_query_value() {
            self.params.push((key.into(), value));
        }

        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the query string with a leading `?`, or an empty string if there are no parameters.
    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }

        let pairs = self
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", encode_query_component(key), encode_query_component(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("?{pairs}")
    }

    /// The parameters as a JSON object, used for error reporting.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.params
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
                .collect(),
        )
    }
}

/// Builds a query string from the given parameters. See [QueryParams::to_query_string].
pub fn generate_query_parameters_string(params: &QueryParams) -> String {
    params.to_query_string()
}
