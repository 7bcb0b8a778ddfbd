use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, ItemFn, LitStr, ReturnType, Stmt};

use crate::helpers::firmata_adaptor_crate_path;

/// See `#[firmata_adaptor::runtime]` for details.
pub fn runtime_macro(item: TokenStream, test: bool) -> TokenStream {
    let firmata_adaptor = firmata_adaptor_crate_path();
    let input = parse_macro_input!(item as ItemFn);

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    let mut stmts = block.stmts;

    // Check if the function has an explicit return type
    let has_return_type = match &sig.output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => match &**ty {
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => false,
            _ => true,
        },
    };

    // Extract the last statement if it's an expression (potential return value)
    let return_expr = match has_return_type {
        true => match stmts.pop() {
            Some(Stmt::Expr(expr, None)) => Some(expr),
            Some(stmt) => {
                stmts.push(stmt);
                None
            }
            None => None,
        },
        false => None,
    };

    // The tokio macros must find tokio through our re-export: users are not required to depend on it.
    let tokio_path = LitStr::new(
        &format!("{}::utils::tokio", firmata_adaptor).replace(' ', ""),
        proc_macro2::Span::call_site(),
    );
    let tokio_main_attr = match test {
        true => quote! {#[#firmata_adaptor::utils::tokio::test(crate = #tokio_path)]},
        false => quote! {#[#firmata_adaptor::utils::tokio::main(crate = #tokio_path)]},
    };

    let mut body = vec![quote! {
        #firmata_adaptor::utils::task::init_task_channel().await;
    }];

    // A trailing `()` is dropped: the return expression (if any) is appended last.
    body.extend(stmts.into_iter().map(|stmt| match stmt {
        Stmt::Expr(syn::Expr::Tuple(ref tuple), _) if tuple.elems.is_empty() => quote!(),
        _ => quote! { #stmt },
    }));

    // Wait for all dynamically spawned tasks to complete.
    body.push(quote! {
        #firmata_adaptor::utils::task::wait_all().await;
    });

    if let Some(return_stmt) = return_expr {
        body.push(quote! { #return_stmt });
    }

    let expanded = quote! {
        #tokio_main_attr
        #(#attrs)*
        #vis #sig {
            #(#body)*
        }
    };

    TokenStream::from(expanded)
}
