use tracing::debug;

/// Most ingredients kept from one block of text.
pub const MAX_INGREDIENTS: usize = 10;

/// Lines containing any of these are receipt boilerplate, not items.
const BOILERPLATE: [&str; 3] = ["Total", "$", "Subtotal"];

/// Word-level fixes for common OCR misreads on receipts.
const OCR_CORRECTIONS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("reciept", "receipt"),
    ("amout", "amount"),
    ("totl", "total"),
    ("balnce", "balance"),
    ("itm", "item"),
    ("nane", "name"),
    ("adrress", "address"),
    ("quanity", "quantity"),
    ("disount", "discount"),
    ("subtoal", "subtotal"),
    ("taxt", "tax"),
    ("produc", "product"),
    ("datc", "date"),
    ("numbcr", "number"),
    ("custmer", "customer"),
    ("paymnt", "payment"),
    ("recipt", "receipt"),
    ("prce", "price"),
    ("toatl", "total"),
    ("valie", "value"),
    ("weigth", "weight"),
    ("oder", "order"),
    ("detils", "details"),
    ("timw", "time"),
];

/// Pull a bounded ingredient list out of raw OCR or typed text.
///
/// Keeps trimmed lines longer than 3 characters that carry none of the
/// receipt markers ("Total", "$", "Subtotal", case-sensitive), in order, up
/// to [`MAX_INGREDIENTS`]. This is best-effort cleanup of noisy receipts, not
/// a grammar. An empty result is not an error here.
pub fn extract(raw_text: &str) -> Vec<String> {
    let list: Vec<String> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 3)
        .filter(|line| !BOILERPLATE.iter().any(|marker| line.contains(*marker)))
        .take(MAX_INGREDIENTS)
        .map(String::from)
        .collect();

    debug!(count = list.len(), "ingredients extracted");
    list
}

/// Lowercase, fix known OCR misspellings word by word, and drop empty or
/// repeated items (first occurrence wins).
pub fn correct_ocr_typos(ingredients: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ingredients.len());
    for item in ingredients {
        let corrected = item
            .to_lowercase()
            .split_whitespace()
            .map(|word| {
                OCR_CORRECTIONS
                    .iter()
                    .find(|(wrong, _)| *wrong == word)
                    .map(|(_, right)| *right)
                    .unwrap_or(word)
            })
            .collect::<Vec<_>>()
            .join(" ");

        if !corrected.is_empty() && !out.contains(&corrected) {
            out.push(corrected);
        }
    }
    out
}
