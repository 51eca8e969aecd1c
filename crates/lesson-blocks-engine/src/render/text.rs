use crate::blocks::{Block, Document, ListStyle, inline::strip_markup};

/// Plain-text rendering of a document, one block per line. Markup is
/// stripped; delimiters and pass-through blocks contribute nothing.
pub fn render_text(doc: &Document) -> String {
    if let Some(markup) = doc.legacy_markup() {
        return strip_markup(markup);
    }
    doc.blocks()
        .iter()
        .filter_map(block_text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn block_text(block: &Block) -> Option<String> {
    match block {
        Block::Heading(h) => Some(strip_markup(&h.text)),
        Block::Paragraph(p) => Some(strip_markup(&p.text)),
        Block::List(list) => Some(
            list.items
                .iter()
                .enumerate()
                .map(|(i, item)| match list.style {
                    ListStyle::Ordered => format!("{}. {}", i + 1, strip_markup(item)),
                    ListStyle::Unordered | ListStyle::Checklist => {
                        format!("- {}", strip_markup(item))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Block::Code(code) => Some(code.code.clone()),
        Block::Quote(q) => Some(match q.caption.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(caption) => format!("{} ({caption})", strip_markup(&q.text)),
            None => strip_markup(&q.text),
        }),
        Block::Table(table) => Some(
            table
                .content
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| strip_markup(cell))
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Block::Delimiter | Block::Unknown(_) => None,
    }
}
