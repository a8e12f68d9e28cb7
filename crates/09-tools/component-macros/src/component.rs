//! 组件派生宏实现

use crate::utils;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Ident, Index, LitStr, Member, Result, Type,
};

/// 结构体上的组件参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 自定义组件名称
    pub name: Option<String>,
    /// 变体标签
    pub tag: Option<LitStr>,
    /// 是否在加载时自动注册
    pub auto_register: bool,
}

/// 字段上的组件参数
#[derive(Default)]
pub struct FieldArgs {
    pub tag: Option<LitStr>,
    pub base: bool,
    pub reference: bool,
    pub skip: bool,
}

/// 基础字段
struct BaseField {
    member: Member,
    capability: Type,
    tag: Option<LitStr>,
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => e.to_compile_error().into(),
    }
}

fn parse_component_args(attrs: &[Attribute]) -> Result<ComponentArgs> {
    let mut args = ComponentArgs::default();

    for attr in attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                args.name = Some(lit.value());
            } else if meta.path.is_ident("tag") {
                args.tag = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("auto_register") {
                args.auto_register = true;
            } else {
                return Err(meta.error("未知的 component 参数"));
            }
            Ok(())
        })?;
    }

    Ok(args)
}

fn parse_field_args(field: &Field) -> Result<FieldArgs> {
    let mut args = FieldArgs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                args.tag = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("base") {
                args.base = true;
            } else if meta.path.is_ident("reference") {
                args.reference = true;
            } else if meta.path.is_ident("skip") {
                args.skip = true;
            } else {
                return Err(meta.error("未知的 component 字段参数"));
            }
            Ok(())
        })?;
    }

    Ok(args)
}

fn member_of(field: &Field, index: usize) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}

fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new_spanned(
                struct_name,
                "#[derive(Component)] 只支持结构体",
            ))
        }
    };

    let args = parse_component_args(&input.attrs)?;

    let mut base: Option<BaseField> = None;
    let mut members = Vec::new();
    let mut references = Vec::new();

    let field_iter: Box<dyn Iterator<Item = &Field>> = match fields {
        Fields::Named(named) => Box::new(named.named.iter()),
        Fields::Unnamed(unnamed) => Box::new(unnamed.unnamed.iter()),
        Fields::Unit => Box::new(std::iter::empty()),
    };

    for (index, field) in field_iter.enumerate() {
        let member = member_of(field, index);
        let field_args = parse_field_args(field)?;
        members.push(member.clone());

        if field_args.skip {
            continue;
        }

        if field_args.base || utils::is_type_named(&field.ty, "Implements") {
            if base.is_some() {
                return Err(Error::new_spanned(field, "组件只能有一个 Implements<_> 字段"));
            }
            let capability = utils::extract_generic_type(&field.ty)
                .cloned()
                .ok_or_else(|| Error::new_spanned(&field.ty, "Implements 缺少能力类型参数"))?;
            base = Some(BaseField {
                member,
                capability,
                tag: field_args.tag,
            });
        } else if field_args.reference || utils::is_type_named(&field.ty, "Ref") {
            if let Some(tag) = field_args.tag {
                return Err(Error::new_spanned(tag, "tag 只能写在结构体或 Implements 字段上"));
            }
            references.push(member);
        } else if let Some(tag) = field_args.tag {
            return Err(Error::new_spanned(tag, "tag 只能写在结构体或 Implements 字段上"));
        }
    }

    let base = base.ok_or_else(|| {
        Error::new_spanned(
            struct_name,
            "组件需要一个 Implements<dyn Capability> 字段来声明能力类型",
        )
    })?;

    let tag = match (&args.tag, &base.tag) {
        (Some(struct_tag), Some(_)) => {
            return Err(Error::new_spanned(struct_tag, "变体标签重复声明"));
        }
        (Some(tag), None) | (None, Some(tag)) => Some(tag.clone()),
        (None, None) => None,
    };
    if let Some(tag) = &tag {
        if tag.value().is_empty() {
            return Err(Error::new_spanned(tag, "变体标签不能为空"));
        }
    }

    let struct_name_string = struct_name.to_string();
    let component_name = args.name.as_deref().unwrap_or(&struct_name_string);
    let capability = &base.capability;
    let base_member = &base.member;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let tag_tokens = match &tag {
        Some(tag) => quote! { ::core::option::Option::Some(#tag) },
        None => quote! { ::core::option::Option::None },
    };

    let reference_fields = references.iter().map(|member| {
        let name = member_name(member);
        quote! {
            ::di_abstractions::ReferenceField::new(#name, &self.#member)
        }
    });

    let registration_code = if args.auto_register {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &input.generics,
                "auto_register 不支持泛型组件",
            ));
        }
        generate_registration_code(struct_name)
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl #impl_generics ::di_abstractions::Implementation for #struct_name #ty_generics #where_clause {
            fn allocate() -> Self {
                Self {
                    #(#members: ::core::default::Default::default(),)*
                }
            }

            fn tag() -> ::core::option::Option<&'static str> {
                #tag_tokens
            }

            fn logger_slot(
                &mut self,
            ) -> ::core::option::Option<&mut dyn ::di_abstractions::AttachLogger> {
                ::core::option::Option::Some(&mut self.#base_member)
            }

            fn references(&self) -> ::std::vec::Vec<::di_abstractions::ReferenceField<'_>> {
                ::std::vec![#(#reference_fields),*]
            }

            fn into_any(
                self: ::std::boxed::Box<Self>,
            ) -> ::std::boxed::Box<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync> {
                self
            }
        }

        impl #impl_generics ::di_abstractions::InstanceOf<#capability> for #struct_name #ty_generics #where_clause {
            fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#capability> {
                self
            }
        }

        impl #impl_generics ::di_abstractions::Component for #struct_name #ty_generics #where_clause {
            type Capability = #capability;

            fn component_name() -> &'static str {
                #component_name
            }
        }

        #registration_code
    };

    Ok(expanded)
}

/// 生成加载时自动注册代码
fn generate_registration_code(struct_name: &Ident) -> proc_macro2::TokenStream {
    let registration_fn_name = Ident::new(
        &format!(
            "__register_component_{}",
            utils::to_snake_case(&struct_name.to_string())
        ),
        Span::call_site(),
    );

    quote! {
        #[::ctor::ctor]
        fn #registration_fn_name() {
            ::di_impl::register(::di_abstractions::Registration::component::<#struct_name>());
        }
    }
}
