//! Declarative macros for Web API operation definitions
//!
//! Instead of hand-writing a struct plus a [`DsOperation`](crate::DsOperation)
//! impl for every call, operations are declared with their API name,
//! method, version, typed parameters and fixed parameters.

/// Define a Web API operation with minimal boilerplate
///
/// Each request field maps to one query parameter through `=> "key"` and
/// must implement `Display`. `fixed` parameters are appended after the
/// fields with constant values.
///
/// # Example
/// ```rust,ignore
/// define_ds_operation! {
///     /// Pause the video renderer
///     operation: PausePlaybackOperation,
///     api: "SYNO.VideoStation2.Controller.Playback",
///     method: "pause",
///     version: 2,
///     request: {
///         device_id: String => "device_id",
///     },
///     fixed: {},
///     response: NoContent,
/// }
/// ```
#[macro_export]
macro_rules! define_ds_operation {
    (
        $(#[$meta:meta])*
        operation: $op_struct:ident,
        api: $api:literal,
        method: $method:literal,
        version: $version:literal,
        request: {
            $($(#[$field_meta:meta])* $field:ident: $field_type:ty => $key:literal),* $(,)?
        },
        fixed: {
            $($fixed_key:literal => $fixed_value:expr),* $(,)?
        },
        response: $response_type:ty $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $op_struct {
            $($(#[$field_meta])* pub $field: $field_type,)*
        }

        impl $crate::operation::DsOperation for $op_struct {
            type Response = $response_type;

            const API: &'static str = $api;
            const METHOD: &'static str = $method;
            const VERSION: u32 = $version;

            fn params(&self) -> Vec<(&'static str, String)> {
                #[allow(unused_mut)]
                let mut params: Vec<(&'static str, String)> = Vec::new();
                $(params.push(($key, self.$field.to_string()));)*
                $(params.push(($fixed_key, $fixed_value.to_string()));)*
                params
            }
        }
    };
}
