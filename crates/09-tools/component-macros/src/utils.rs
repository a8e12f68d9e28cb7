//! 宏工具函数

use syn::{GenericArgument, PathArguments, Type};

/// 类型路径的最后一段是否为指定名称，如 `di_abstractions::Ref<T>` 对应 `Ref`
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == name),
        Type::Group(group) => is_type_named(&group.elem, name),
        _ => false,
    }
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) => {
            let segment = type_path.path.segments.last()?;
            match &segment.arguments {
                PathArguments::AngleBracketed(args) => match args.args.first() {
                    Some(GenericArgument::Type(inner_type)) => Some(inner_type),
                    _ => None,
                },
                _ => None,
            }
        }
        Type::Group(group) => extract_generic_type(&group.elem),
        _ => None,
    }
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 检查前一个字符是否为小写，或者下一个字符是否为小写
            let prev_is_lower = chars.get(i - 1).map_or(false, |c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.push(ch.to_lowercase().next().unwrap_or(ch));
    }

    result
}
