use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, ReturnType, parse_macro_input};

/// Cache the value computed by a `&self` method.
///
/// The struct must carry a `_cache: RwLock<InnerCache>` field where
/// `InnerCache` has an `Option<T>` field with the same name as the method
/// and `T` is the method's return type. The first call runs the body and
/// stores a clone, later calls return a clone of the stored value until
/// the field is reset to `None`.
///
/// A poisoned lock is recovered rather than propagated: the cache only ever
/// holds fully computed values.
#[proc_macro_attribute]
pub fn cache_access(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let ret = match &input.sig.output {
        ReturnType::Type(_, ty) => ty.clone(),
        ReturnType::Default => {
            return syn::Error::new_spanned(
                &input.sig,
                "#[cache_access] requires a method with a return value",
            )
            .to_compile_error()
            .into();
        }
    };

    let fn_name_ident = input.sig.ident.clone();
    let fn_attrs = input.attrs;
    let fn_body = input.block;
    let fn_sig = input.sig;
    let fn_vis = input.vis;

    let expanded = quote! {
        #(#fn_attrs)*
        #fn_vis #fn_sig {
            if let Some(cached) = self
                ._cache
                .read()
                .unwrap_or_else(::std::sync::PoisonError::into_inner)
                .#fn_name_ident
                .as_ref()
            {
                return cached.clone();
            }

            let computed: #ret = (|| #fn_body)();
            self._cache
                .write()
                .unwrap_or_else(::std::sync::PoisonError::into_inner)
                .#fn_name_ident = Some(computed.clone());
            computed
        }
    };

    TokenStream::from(expanded)
}
