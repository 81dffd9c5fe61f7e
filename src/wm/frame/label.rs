//! Label text fitting

use crate::wm::style::Justify;

const ELLIPSIS: &str = "...";

/// Title text as it will be drawn inside the label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedTitle {
    pub text: String,
    /// X offset inside the label window
    pub x: i32,
}

/// Largest `i` with `fits(cuts[i])`, for a `fits` that holds up to some
/// point and fails after it
fn last_fitting(cuts: &[usize], fits: impl Fn(usize) -> bool) -> Option<usize> {
    let (mut lo, mut hi) = (0, cuts.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if fits(cuts[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.checked_sub(1)
}

/// Shorten `title` until it fits between the bevels of a label
/// `label_width` pixels wide.
///
/// `measure` is called a logarithmic number of times in the title length.
/// Returns `None` when there is no room for any text at all.
pub fn fit_title(
    title: &str,
    label_width: u32,
    bevel: u32,
    justify: Justify,
    measure: impl Fn(&str) -> u32,
) -> Option<FittedTitle> {
    if bevel * 2 >= label_width {
        return None;
    }
    let max = label_width - bevel * 2;

    let mut text = title.to_string();
    let mut width = measure(title);
    if width > max {
        // byte offsets of every char boundary, shortest prefix first
        let cuts: Vec<usize> = title
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(title.len()))
            .collect();
        let keep = last_fitting(&cuts, |end| measure(&title[..end]) <= max)?;
        let prefix = &title[..cuts[keep]];

        // make room for the ellipsis if it can fit at all
        let elided = last_fitting(&cuts[..=keep], |end| {
            measure(&format!("{}{}", &title[..end], ELLIPSIS)) <= max
        });
        text = match elided {
            Some(i) => format!("{}{}", &title[..cuts[i]], ELLIPSIS),
            None => prefix.to_string(),
        };
        width = measure(&text);
    }

    if text.is_empty() {
        return None;
    }

    let slack = (max - width) as i32;
    let x = bevel as i32
        + match justify {
            Justify::Left => 0,
            Justify::Center => slack / 2,
            Justify::Right => slack,
        };

    Some(FittedTitle { text, x })
}
