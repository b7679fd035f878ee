// WHY: whitespace handling shared by segmentation preprocessing and change comparison
// Display text only ever sees collapse_whitespace; comparison_key never reaches the renderer

/// Collapse line breaks and whitespace runs into single spaces, trimming both ends
/// Treats \r\n as a single break so CRLF drafts segment like LF drafts
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_whitespace_into(text, &mut result);
    result
}

/// Collapse whitespace into supplied buffer to avoid allocation
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            // \r, \n and every other whitespace char fold into one pending space
            pending_space = true;
            continue;
        }

        if pending_space && !buffer.is_empty() {
            buffer.push(' ');
        }
        pending_space = false;
        buffer.push(ch);
    }
}

/// Comparison-only form of a sentence: whitespace collapsed, Unicode lower-cased
/// Never use the result for display
pub fn comparison_key(sentence: &str) -> String {
    let mut key = String::with_capacity(sentence.len());
    comparison_key_into(sentence, &mut key);
    key
}

/// Build the comparison key into a reusable buffer
pub fn comparison_key_into(sentence: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(sentence.len());

    let mut pending_space = false;

    for ch in sentence.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !buffer.is_empty() {
            buffer.push(' ');
        }
        pending_space = false;
        buffer.extend(ch.to_lowercase());
    }
}
