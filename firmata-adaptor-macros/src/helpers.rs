use proc_macro2::TokenStream;
use quote::quote;

/// Determines what path should be used to refer to `firmata_adaptor`:
/// `crate::...` from within the crate itself, `firmata_adaptor::...` anywhere else.
///
/// Doctests are compiled with the crate name of the crate they document, but as external crates:
/// rustdoc flags them with `UNSTABLE_RUSTDOC_TEST_PATH`.
pub fn firmata_adaptor_crate_path() -> TokenStream {
    let is_doctest = std::env::var("UNSTABLE_RUSTDOC_TEST_PATH").is_ok();
    let is_internal = std::env::var("CARGO_CRATE_NAME")
        .map(|pkg_name| pkg_name == "firmata_adaptor")
        .unwrap_or_default();

    match is_internal && !is_doctest {
        true => quote!(crate),
        false => quote!(firmata_adaptor),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    // Environment variables are process-wide: all cases run in a single test.
    #[test]
    fn test_firmata_adaptor_crate_path() {
        env::set_var("CARGO_CRATE_NAME", "firmata_adaptor");
        assert_eq!(firmata_adaptor_crate_path().to_string(), "crate");

        env::set_var("UNSTABLE_RUSTDOC_TEST_PATH", "src/utils/task.rs");
        assert_eq!(firmata_adaptor_crate_path().to_string(), "firmata_adaptor");
        env::remove_var("UNSTABLE_RUSTDOC_TEST_PATH");

        env::set_var("CARGO_CRATE_NAME", "some_other_crate");
        assert_eq!(firmata_adaptor_crate_path().to_string(), "firmata_adaptor");

        env::remove_var("CARGO_CRATE_NAME");
        assert_eq!(firmata_adaptor_crate_path().to_string(), "firmata_adaptor");
    }
}
