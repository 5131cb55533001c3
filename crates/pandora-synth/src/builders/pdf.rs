//! Hand-assembled PDF 1.4 with one standard font.
//!
//! Text is word-wrapped into fixed-width lines and paginated; there is no
//! font metrics table, so wrapping is by character count.

use super::paragraphs;
use crate::faker::Faker;

const LINE_CHARS: usize = 88;
const LINES_PER_PAGE: usize = 50;
const TOP: u32 = 760;
const LEADING: u32 = 14;

pub(super) fn pdf(fake: &mut Faker, text: Option<&str>) -> Vec<u8> {
    let (title, body) = match text.map(paragraphs) {
        Some(mut paras) if paras.len() > 1 => {
            let title = paras.remove(0);
            (title, paras)
        }
        Some(paras) if !paras.is_empty() => (fake.title(), paras),
        _ => {
            let n = fake.range(3, 9);
            let paras = (0..n)
                .map(|_| {
                    let sentences = fake.range(3, 10);
                    fake.paragraph(sentences)
                })
                .collect();
            (fake.title(), paras)
        }
    };

    let mut lines: Vec<(String, bool)> = vec![(title.clone(), true), (String::new(), false)];
    for para in &body {
        lines.extend(wrap(para, LINE_CHARS).into_iter().map(|l| (l, false)));
        lines.push((String::new(), false));
    }
    render(&title, &lines)
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            out.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}

/// Escape a PDF literal string, replacing anything outside printable ASCII.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn render(title: &str, lines: &[(String, bool)]) -> Vec<u8> {
    let pages: Vec<&[(String, bool)]> = lines.chunks(LINES_PER_PAGE).collect();
    let page_count = pages.len();

    // Object layout: 1 catalog, 2 page tree, 3 font, 4 info, then a
    // (page, contents) pair per page.
    let page_obj = |i: usize| 5 + 2 * i;
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", page_obj(i))).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
            kids.join(" ")
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Title ({}) /Producer (Microsoft Word) >>", escape(title)),
    ];

    for (i, page) in pages.iter().enumerate() {
        let mut stream = String::from("BT\n/F1 11 Tf\n");
        stream.push_str(&format!("{LEADING} TL\n72 {TOP} Td\n"));
        for (text, heading) in page.iter() {
            if *heading {
                stream.push_str(&format!("/F1 16 Tf\n({}) Tj T*\n/F1 11 Tf\n", escape(text)));
            } else {
                stream.push_str(&format!("({}) Tj T*\n", escape(text)));
            }
        }
        stream.push_str("ET\n");

        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_obj(i) + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{obj}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in &offsets {
        xref.push_str(&format!("{off:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = pdf(&mut Faker::new(5), None);
        let text = String::from_utf8_lossy(&bytes);
        let start = text.rfind("startxref\n").unwrap() + "startxref\n".len();
        let xref_at: usize = text[start..].lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref"));

        let tail = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        let entries: Vec<&str> = tail.lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
        assert!(!entries.is_empty());
        for (i, entry) in entries.iter().enumerate() {
            let off: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[off..].starts_with(expected.as_bytes()), "object {} misplaced", i + 1);
        }
    }

    #[test]
    fn long_text_paginates() {
        let long = (0..400).map(|i| format!("Paragraph {i} text.")).collect::<Vec<_>>().join("\n\n");
        let bytes = pdf(&mut Faker::new(5), Some(&long));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.matches("/Type /Page ").count() > 1);
    }

    #[test]
    fn literal_strings_are_escaped() {
        assert_eq!(escape("a (b) \\ é"), "a \\(b\\) \\\\ ?");
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five six", 9);
        assert!(lines.iter().all(|l| l.len() <= 9));
        assert_eq!(lines.join(" "), "one two three four five six");
    }
}
