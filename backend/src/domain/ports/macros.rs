//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor
//! whose fields accept anything convertible into the stored type, so
//! adapters can write `PostPersistenceError::query(err.to_string())`.

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
    //! Regression coverage for the generated constructors.
    use rstest::rstest;

    define_port_error! {
        pub enum ExamplePortError {
            Backend { message: String } => "backend failed: {message}",
            Retry { attempts: u32 } => "gave up after {attempts} attempts",
            Row { message: String, id: i64 } => "row {id}: {message}",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = ExamplePortError::backend("socket closed");
        assert_eq!(err.to_string(), "backend failed: socket closed");
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        let err = ExamplePortError::retry(3_u32);
        assert_eq!(err, ExamplePortError::Retry { attempts: 3 });
    }

    #[rstest]
    fn mixed_fields_are_ordered_as_declared() {
        let err = ExamplePortError::row("locked", 7_i64);
        assert_eq!(err.to_string(), "row 7: locked");
    }
}
