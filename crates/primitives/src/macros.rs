/// Implements the common surface of a fixed-size byte buffer type: the zero
/// value, hex formatting, hex (de)serialization and parsing.
macro_rules! impl_buf_common {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Returns the all-zero buffer.
            pub const fn zero() -> Self {
                Self([0; $len])
            }

            /// Checks whether every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl ::std::convert::AsRef<[u8; $len]> for $name {
            fn as_ref(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl ::std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&::const_hex::encode_prefixed(self.0))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                // Short form is enough to tell values apart in logs.
                let hex = ::const_hex::encode(self.0);
                write!(f, "{}..{}", &hex[..6], &hex[hex.len() - 6..])
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::const_hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::const_hex::decode_to_array::<_, $len>(s).map(Self)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&::const_hex::encode_prefixed(self.0))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse::<Self>().map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Implements conversions and formatting for a newtype wrapping a buffer.
#[macro_export]
macro_rules! impl_buf_wrapper {
    ($wrapper:ident, $name:ident, $len:expr) => {
        impl $wrapper {
            /// Returns the null (all-zero) value.
            pub const fn zero() -> Self {
                Self($name::zero())
            }

            /// Checks whether this is the null (all-zero) value.
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            pub fn inner(&self) -> &$name {
                &self.0
            }
        }

        impl ::std::convert::From<$name> for $wrapper {
            fn from(value: $name) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$wrapper> for $name {
            fn from(value: $wrapper) -> Self {
                value.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $wrapper {
            fn from(value: [u8; $len]) -> Self {
                Self($name::from(value))
            }
        }

        impl ::std::convert::AsRef<[u8; $len]> for $wrapper {
            fn as_ref(&self) -> &[u8; $len] {
                self.0.as_ref()
            }
        }

        impl ::core::fmt::Debug for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(&self.0, f)
            }
        }

        impl ::core::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $wrapper {
            type Err = ::const_hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$name>().map(Self)
            }
        }
    };
}
