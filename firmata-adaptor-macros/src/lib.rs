//! Defines Firmata-Adaptor runtime macros.

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

extern crate proc_macro;

mod helpers;
mod runtime_macro;

use proc_macro::TokenStream;

/// Macro definition for the Firmata-Adaptor runtime.
///
/// This macro should be used once only in a project.
///
/// _Runs the function on a tokio runtime and waits for every task subsequently spawned
/// through `task::run` (event callbacks included) before returning._
///
/// # Example
/// ```
/// #[firmata_adaptor::runtime]
/// async fn main() {
///     // whatever
/// }
/// ```
#[proc_macro_attribute]
pub fn runtime(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro::runtime_macro(item, false)
}

/// Same as `#[firmata_adaptor::runtime]` but for tests.
#[proc_macro_attribute]
pub fn test(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro::runtime_macro(item, true)
}
