//! 商品代碼與品名處理

/// 由 SKU 取得商品代碼（kode kecil）：去除結尾的 `Z<數字>` 尺寸後綴
///
/// `M1SPV201Z40` → `M1SPV201`；沒有尺寸後綴的 SKU 原樣返回
pub fn product_code(sku: &str) -> &str {
    let stem = sku.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == sku.len() {
        return sku;
    }

    stem.strip_suffix('Z').unwrap_or(sku)
}

/// 由品名取得款式名稱：去除結尾的尺寸標記
///
/// `"SANDAL X, 40"`、`"SANDAL X, 40/41"`、`"SANDAL X, SIZE 40"` → `"SANDAL X"`
pub fn article_name(name: &str) -> String {
    let stripped = strip_after_last_comma(name, is_size_range);
    let stripped = strip_after_last_comma(stripped, is_size_label);
    stripped.trim().to_string()
}

fn strip_after_last_comma(name: &str, is_suffix: fn(&str) -> bool) -> &str {
    match name.rfind(',') {
        Some(idx) if is_suffix(name[idx + 1..].trim_start()) => &name[..idx],
        _ => name,
    }
}

/// `40`、`40/41`、`40/`
fn is_size_range(tail: &str) -> bool {
    let (head, rest) = match tail.split_once('/') {
        Some((head, rest)) => (head, rest),
        None => (tail, ""),
    };
    is_digits(head) && rest.chars().all(|c| c.is_ascii_digit())
}

/// `40`、`SIZE 40`、`SIZE40`
fn is_size_label(tail: &str) -> bool {
    let digits = tail
        .strip_prefix("SIZE")
        .map(str::trim_start)
        .unwrap_or(tail);
    is_digits(digits)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
