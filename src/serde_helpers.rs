//! Shared serde helpers for loosely-typed configuration values.

/// Implements `Deserialize` and `Serialize` for enums that accept several
/// YAML shapes.
///
/// Deserialization always succeeds: the input is first read into a
/// `serde_yaml::Value` and handed to the `classify` body, which maps it to a
/// variant. Shapes the enum does not recognize are expected to land in an
/// `Invalid(Value)` variant so the validator can report them later instead
/// of aborting the manifest load.
///
/// Serialization goes through the `to_value` body, which maps each variant
/// back to the `serde_yaml::Value` it came from.
///
/// # Parameters
///
/// - `$type`: The enum type name
/// - `$expecting`: A human-readable description used in trace output
/// - `$value_ident`: Identifier bound to the raw `Value` in `classify`
/// - `$classify_body`: Expression block returning `$type`
/// - `$self_ident`: Identifier bound to `&self` in `to_value`
/// - `$to_value_body`: Expression block returning `serde_yaml::Value`
macro_rules! impl_loose_value_serde {
    (
        $type:ident,
        expecting: $expecting:expr,
        classify($value_ident:ident) $classify_body:block,
        to_value($self_ident:ident) $to_value_body:block
    ) => {
        impl $type {
            /// Classifies a raw YAML value into this type.
            pub fn from_value($value_ident: ::serde_yaml::Value) -> Self {
                $classify_body
            }

            /// Returns the YAML value this setting represents.
            pub fn to_value(&self) -> ::serde_yaml::Value {
                let $self_ident = self;
                $to_value_body
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let value =
                    <::serde_yaml::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                let classified = $type::from_value(value);
                ::tracing::trace!(expecting = $expecting, "classified {:?}", classified);
                Ok(classified)
            }
        }

        impl ::serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                ::serde::Serialize::serialize(&self.to_value(), serializer)
            }
        }
    };
}

pub(crate) use impl_loose_value_serde;
