/*!
 * Palette colour conversion.
 *
 * KBP palettes store colours as three hex digits (`RGB`, one digit per
 * channel). ASS wants `&HAABBGGRR`: alpha first, channels reversed, two
 * digits each.
 */

/// Palette slot that KBS always uses for the background
pub const BACKGROUND_INDEX: usize = 0;

const OPAQUE: &str = "&H00";
const TRANSPARENT: &str = "&HFF";

/// Convert one palette entry to an ASS colour code.
///
/// The background entry becomes fully transparent when `transparency` is
/// set; every other entry is opaque.
pub fn palette_to_ass(entry: &str, index: usize, transparency: bool) -> String {
    let alpha = if index == BACKGROUND_INDEX && transparency {
        TRANSPARENT
    } else {
        OPAQUE
    };

    let mut code = String::with_capacity(alpha.len() + entry.len() * 2);
    code.push_str(alpha);
    for digit in entry.chars().rev() {
        code.push(digit);
        code.push(digit);
    }
    code
}

/// Look up `index` in `palette` and convert it
pub fn palette_color(palette: &[String], index: usize, transparency: bool) -> Option<String> {
    palette
        .get(index)
        .map(|entry| palette_to_ass(entry, index, transparency))
}
