//! Helper macro generating port error enums with snake_case constructors.
//!
//! Each variant gets a constructor named after it (`Connection` becomes
//! `connection(..)`) whose `String` fields accept anything `Into<String>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ProbeError {
            Offline { message: String } => "store offline: {message}",
            MissingRow { id: i64 } => "row {id} missing",
            Gone => "gone",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(ProbeError::offline("reset").to_string(), "store offline: reset");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(ProbeError::missing_row(42_i64), ProbeError::MissingRow { id: 42 });
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(ProbeError::gone().to_string(), "gone");
    }
}
