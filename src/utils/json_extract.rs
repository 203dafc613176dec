// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 在自由文本中定位第一个配平的顶层JSON对象
///
/// 评分服务的回复可能在JSON前后夹带说明文字，此函数扫描到第一个
/// `{`，按括号深度配平（忽略字符串字面量内部的括号），返回完整的
/// 对象切片。找不到配平的对象时返回`None`，由调用方决定失败语义。
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    // Brace bytes are ASCII, so the slice boundary is valid UTF-8.
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
