use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::QuizResult;

use super::layout::{Line, LineStyle, Page, PAGE_HEIGHT, PAGE_WIDTH};

const FONT: &str = "F1";

fn points(mm: u32) -> i64 {
    (mm as i64 * 720 + 127) / 254
}

fn colour(style: LineStyle) -> Vec<Object> {
    match style {
        LineStyle::Normal => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        LineStyle::Correct => vec![Object::Integer(0), Object::Real(0.5), Object::Integer(0)],
        LineStyle::Incorrect => vec![Object::Integer(1), Object::Integer(0), Object::Integer(0)],
    }
}

/// Helvetica is WinAnsi encoded; characters outside Latin-1 print as '?'.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn line_operations(line: &Line) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("rg", colour(line.style)),
        Operation::new("Tf", vec![FONT.into(), Object::Integer(line.size as i64)]),
        Operation::new("Td", vec![
            Object::Integer(points(line.x)),
            Object::Integer(points(PAGE_HEIGHT.saturating_sub(line.y))),
        ]),
        Operation::new("Tj", vec![Object::string_literal(encode_text(&line.text))]),
        Operation::new("ET", vec![]),
    ]
}

fn page_content(page: &Page) -> Content {
    Content { operations: page.lines.iter().flat_map(line_operations).collect() }
}

/// Renders laid-out pages into a PDF file.
pub(super) fn render(pages: &[Page]) -> QuizResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(page).encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(points(PAGE_WIDTH)),
            Object::Integer(points(PAGE_HEIGHT)),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, style: LineStyle) -> Line {
        Line { x: 20, y: 50, size: 12, style, text: text.to_string() }
    }

    #[test]
    fn a4_in_points() {
        assert_eq!(points(PAGE_WIDTH), 595);
        assert_eq!(points(PAGE_HEIGHT), 842);
    }

    #[test]
    fn non_latin_characters_become_question_marks() {
        assert_eq!(encode_text("Café"), b"Caf\xe9".to_vec());
        assert_eq!(encode_text("λ → x"), b"? ? x".to_vec());
    }

    #[test]
    fn correct_answer_colours() {
        let page = Page { lines: vec![line("right", LineStyle::Correct), line("wrong", LineStyle::Incorrect)] };
        let content = page_content(&page);
        let colours: Vec<Vec<f64>> = content.operations.iter()
            .filter(|op| op.operator == "rg")
            .map(|op| op.operands.iter().map(|o| o.as_float().unwrap() as f64).collect())
            .collect();
        assert_eq!(colours, vec![vec![0.0, 0.5, 0.0], vec![1.0, 0.0, 0.0]]);
        assert_eq!(content.operations.iter().filter(|op| op.operator == "Tj").count(), 2);
    }

    #[test]
    fn text_position_is_measured_from_the_top() {
        let ops = line_operations(&line("x", LineStyle::Normal));
        let td = ops.iter().find(|op| op.operator == "Td").unwrap();
        let offsets: Vec<i64> = td.operands.iter().map(|o| o.as_i64().unwrap()).collect();
        assert_eq!(offsets, vec![57, 700]);
    }

    #[test]
    fn renders_one_pdf_page_per_layout_page() {
        let pages = vec![
            Page { lines: vec![line("first", LineStyle::Normal)] },
            Page::default(),
            Page { lines: vec![line("third", LineStyle::Correct)] },
        ];
        let bytes = render(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }
}
