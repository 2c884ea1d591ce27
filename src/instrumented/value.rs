//! Conversion of caller data into stored bytes.

/// Data that can be written into the store.
///
/// Numbers are stored as their decimal text, so a stored integer can later
/// be read back with [`InstrumentedCache::get_int`](super::InstrumentedCache::get_int).
pub trait IntoValue {
    fn into_value(self) -> Vec<u8>;
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Vec<u8> {
        self
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> IntoValue for &[u8; N] {
    fn into_value(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl IntoValue for String {
    fn into_value(self) -> Vec<u8> {
        self.into_bytes()
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

macro_rules! impl_into_value_for_numbers {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Vec<u8> {
                    self.to_string().into_bytes()
                }
            }
        )*
    };
}

impl_into_value_for_numbers!(i32, i64, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_bytes() {
        assert_eq!("foo".into_value(), b"foo".to_vec());
        assert_eq!(String::from("bar").into_value(), b"bar".to_vec());
        assert_eq!(b"baz".into_value(), b"baz".to_vec());
        assert_eq!(vec![0u8, 255].into_value(), vec![0u8, 255]);
    }

    #[test]
    fn test_numbers_are_decimal_text() {
        assert_eq!(123i64.into_value(), b"123".to_vec());
        assert_eq!(0u32.into_value(), b"0".to_vec());
        assert_eq!((-7i32).into_value(), b"-7".to_vec());
        assert_eq!(2.5f64.into_value(), b"2.5".to_vec());
    }
}
