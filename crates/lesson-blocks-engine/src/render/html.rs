use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::blocks::{
    Block, CodeData, Document, HeadingData, ListData, ListStyle, OpaqueBlock, QuoteData,
    TableData,
};

pub const EMPTY_DOCUMENT_HTML: &str =
    "<div class=\"empty-document\"><p>This lesson has no content yet.</p></div>";

/// Render a whole document, one block per line.
///
/// Untouched legacy content is emitted verbatim without block dispatch; an
/// empty document renders the "no content" placeholder.
pub fn render_document(doc: &Document) -> String {
    if let Some(markup) = doc.legacy_markup() {
        return markup.to_string();
    }
    if doc.is_empty() {
        return EMPTY_DOCUMENT_HTML.to_string();
    }
    doc.blocks()
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one block. Never fails: unknown kinds become a labelled placeholder.
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    match block {
        Block::Heading(heading) => write_heading(&mut out, heading),
        Block::Paragraph(p) => {
            let _ = write!(out, "<p class=\"paragraph\">{}</p>", p.text);
        }
        Block::List(list) => write_list(&mut out, list),
        Block::Code(code) => write_code(&mut out, code),
        Block::Quote(quote) => write_quote(&mut out, quote),
        Block::Delimiter => out.push_str("<hr class=\"delimiter\">"),
        Block::Table(table) => write_table(&mut out, table),
        Block::Unknown(opaque) => write_unsupported(&mut out, opaque),
    }
    out
}

/// Clamp a stored heading level into `h1`..`h6`
pub fn heading_tag_level(level: i64) -> u8 {
    level.clamp(1, 6) as u8
}

fn write_heading(out: &mut String, heading: &HeadingData) {
    let level = heading_tag_level(heading.level);
    let _ = write!(
        out,
        "<h{level} class=\"heading level-{level}\">{}</h{level}>",
        heading.text
    );
}

fn write_list(out: &mut String, list: &ListData) {
    let (tag, class) = match list.style {
        ListStyle::Ordered => ("ol", "list list-ordered"),
        ListStyle::Unordered => ("ul", "list list-unordered"),
        ListStyle::Checklist => ("ul", "list list-checklist"),
    };
    let _ = write!(out, "<{tag} class=\"{class}\">");
    for item in &list.items {
        let _ = write!(out, "<li>{item}</li>");
    }
    let _ = write!(out, "</{tag}>");
}

fn write_code(out: &mut String, code: &CodeData) {
    let _ = write!(
        out,
        "<pre class=\"code-block\"><code>{}</code></pre>",
        encode_text(&code.code)
    );
}

fn write_quote(out: &mut String, quote: &QuoteData) {
    let _ = write!(out, "<blockquote class=\"block-quote\"><p>{}</p>", quote.text);
    if let Some(caption) = quote.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        let _ = write!(out, "<cite>{}</cite>", encode_text(caption));
    }
    out.push_str("</blockquote>");
}

fn write_table(out: &mut String, table: &TableData) {
    let width = table.content.iter().map(Vec::len).max().unwrap_or(0);
    let (header, body) = match table.content.split_first() {
        Some((header, body)) if table.with_headings => (Some(header), body),
        _ => (None, table.content.as_slice()),
    };

    out.push_str("<table class=\"table\">");
    if let Some(header) = header {
        out.push_str("<thead>");
        write_row(out, header, width, "th");
        out.push_str("</thead>");
    }
    out.push_str("<tbody>");
    for row in body {
        write_row(out, row, width, "td");
    }
    out.push_str("</tbody></table>");
}

fn write_row(out: &mut String, row: &[String], width: usize, cell_tag: &str) {
    out.push_str("<tr>");
    for column in 0..width {
        let cell = row.get(column).map_or("", String::as_str);
        let _ = write!(out, "<{cell_tag}>{cell}</{cell_tag}>");
    }
    out.push_str("</tr>");
}

fn write_unsupported(out: &mut String, opaque: &OpaqueBlock) {
    let _ = write!(
        out,
        "<div class=\"unsupported-block\" data-kind=\"{}\">Unsupported block: {}</div>",
        encode_double_quoted_attribute(&opaque.kind),
        encode_text(&opaque.kind)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(4, 4)]
    #[case(6, 6)]
    #[case(9, 6)]
    #[case(255, 6)]
    #[case(-1, 1)]
    #[case(300, 6)]
    fn heading_levels_clamp(#[case] stored: i64, #[case] rendered: u8) {
        assert_eq!(heading_tag_level(stored), rendered);
    }

    #[rstest]
    #[case("-1", 1)]
    #[case("0", 1)]
    #[case("7", 6)]
    #[case("300", 6)]
    fn stored_heading_levels_render_clamped(#[case] stored: &str, #[case] rendered: u8) {
        let raw = format!(
            r#"{{"blocks":[{{"type":"heading","data":{{"level":{stored},"text":"X"}}}}]}}"#
        );
        assert_eq!(
            render_document(&crate::codec::deserialize(&raw)),
            format!("<h{rendered} class=\"heading level-{rendered}\">X</h{rendered}>")
        );
    }

    #[test]
    fn out_of_range_heading_renders_as_h6() {
        assert_eq!(
            render_block(&Block::heading(9, "Deep")),
            "<h6 class=\"heading level-6\">Deep</h6>"
        );
    }

    #[test]
    fn rich_text_is_not_escaped() {
        assert_eq!(
            render_block(&Block::paragraph("<b>Hi</b> &amp; bye")),
            "<p class=\"paragraph\"><b>Hi</b> &amp; bye</p>"
        );
    }

    #[test]
    fn code_is_escaped() {
        assert_eq!(
            render_block(&Block::code("if a < b && c {}")),
            "<pre class=\"code-block\"><code>if a &lt; b &amp;&amp; c {}</code></pre>"
        );
    }

    #[rstest]
    #[case(ListStyle::Ordered, "<ol class=\"list list-ordered\"><li>a</li><li>b</li></ol>")]
    #[case(ListStyle::Unordered, "<ul class=\"list list-unordered\"><li>a</li><li>b</li></ul>")]
    #[case(ListStyle::Checklist, "<ul class=\"list list-checklist\"><li>a</li><li>b</li></ul>")]
    fn list_styles(#[case] style: ListStyle, #[case] expected: &str) {
        let block = Block::list(style, vec!["a".into(), "b".into()]);
        assert_eq!(render_block(&block), expected);
    }

    #[test]
    fn quote_caption_only_when_present() {
        assert_eq!(
            render_block(&Block::quote("Q", Some(String::new()))),
            "<blockquote class=\"block-quote\"><p>Q</p></blockquote>"
        );
        assert_eq!(
            render_block(&Block::quote("Q", Some("A & B".into()))),
            "<blockquote class=\"block-quote\"><p>Q</p><cite>A &amp; B</cite></blockquote>"
        );
    }

    #[test]
    fn table_with_headings_has_header_section() {
        let block = Block::Table(TableData {
            with_headings: true,
            content: vec![
                vec!["H1".into(), "H2".into()],
                vec!["a".into(), "b".into()],
                vec!["c".into(), "d".into()],
            ],
        });
        let html = render_block(&block);
        assert_eq!(html.matches("<thead>").count(), 1);
        assert_eq!(html.matches("<th>").count(), 2);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("<td>").count(), 4);
    }

    #[test]
    fn short_rows_render_missing_cells_empty() {
        let block = Block::Table(TableData {
            with_headings: false,
            content: vec![vec!["a".into(), "b".into()], vec!["c".into()]],
        });
        assert_eq!(
            render_block(&block),
            "<table class=\"table\"><tbody><tr><td>a</td><td>b</td></tr><tr><td>c</td><td></td></tr></tbody></table>"
        );
    }

    #[test]
    fn headings_flag_on_empty_table_has_no_header() {
        let block = Block::Table(TableData {
            with_headings: true,
            content: vec![],
        });
        assert_eq!(
            render_block(&block),
            "<table class=\"table\"><tbody></tbody></table>"
        );
    }

    #[test]
    fn unknown_kind_renders_named_placeholder() {
        let html = render_block(&Block::opaque("<script>", json!({})));
        assert_eq!(
            html,
            "<div class=\"unsupported-block\" data-kind=\"&lt;script&gt;\">Unsupported block: &lt;script&gt;</div>"
        );
    }

    #[test]
    fn unknown_kind_does_not_stop_siblings() {
        let doc = Document::from_blocks(vec![
            Block::paragraph("before"),
            Block::opaque("unsupported-widget", json!({ "x": 1 })),
            Block::paragraph("after"),
        ]);
        let html = render_document(&doc);
        assert!(html.contains("before"));
        assert!(html.contains("Unsupported block: unsupported-widget"));
        assert!(html.contains("after"));
    }

    #[test]
    fn empty_document_renders_placeholder() {
        assert_eq!(render_document(&Document::new()), EMPTY_DOCUMENT_HTML);
    }

    #[test]
    fn legacy_document_renders_verbatim() {
        let doc = Document::legacy("<p>Hello</p><script>x</script>");
        assert_eq!(render_document(&doc), "<p>Hello</p><script>x</script>");
    }
}
