//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `snake_case` constructor. Field parameters accept
//! `impl Into<T>` so adapters can pass `&str` or a `Display` rendering
//! without spelling out conversions.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),+ $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),+ } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),+ } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Busy => "resource is busy",
            Stale { message: String, attempts: u32 } => "stale after {attempts}: {message}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::connection("pool timed out");
        assert_eq!(err.to_string(), "connection failed: pool timed out");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::busy(), SamplePortError::Busy);
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::stale("row changed", 3_u32);
        assert_eq!(err.to_string(), "stale after 3: row changed");
    }
}
