//! Office Open XML packages: word-processing, spreadsheet, presentation.
//!
//! Each package carries only the parts a reader needs to open it: content
//! types, package relationships, core properties, and the main document
//! parts. Legacy extensions (`.doc`, `.xls`, `.ppt`) get the same OOXML
//! bytes; readers sniff the container rather than trusting the name.

use std::io;

use chrono::NaiveDateTime;

use super::zipfile::ZipBuilder;
use super::{paragraphs, xml_escape};
use crate::faker::Faker;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_S: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_DOC: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_SHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_PRES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

// -- Package plumbing ---------------------------------------------------------

struct Package {
    created: NaiveDateTime,
    parts: Vec<(String, String)>,
    overrides: Vec<(String, &'static str)>,
}

impl Package {
    /// Start a package whose main part is `main` (e.g. `word/document.xml`).
    fn new(fake: &mut Faker, main: &str, title: &str) -> Self {
        let mut pkg = Self {
            created: fake.timestamp(),
            parts: Vec::new(),
            overrides: Vec::new(),
        };
        pkg.part(
            "_rels/.rels",
            None,
            relationships(&[
                ("rId1", "officeDocument", main),
                ("rId2", "core-properties", "docProps/core.xml"),
            ]),
        );
        let created = pkg.created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        pkg.part(
            "docProps/core.xml",
            Some(CT_CORE),
            format!(
                "{XML_DECL}<cp:coreProperties \
                 xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
                 xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
                 xmlns:dcterms=\"http://purl.org/dc/terms/\" \
                 xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
                 <dc:title>{}</dc:title><dc:creator>{}</dc:creator>\
                 <dcterms:created xsi:type=\"dcterms:W3CDTF\">{created}</dcterms:created>\
                 </cp:coreProperties>",
                xml_escape(title),
                xml_escape(&fake.name()),
            ),
        );
        pkg
    }

    fn part(&mut self, name: &str, content_type: Option<&'static str>, xml: String) {
        if let Some(ct) = content_type {
            self.overrides.push((format!("/{name}"), ct));
        }
        self.parts.push((name.to_string(), xml));
    }

    fn finish(self) -> io::Result<Vec<u8>> {
        let mut types = format!(
            "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>"
        );
        for (name, ct) in &self.overrides {
            types.push_str(&format!("<Override PartName=\"{name}\" ContentType=\"{ct}\"/>"));
        }
        types.push_str("</Types>");

        let mut zip = ZipBuilder::new(self.created);
        zip.add("[Content_Types].xml", types.as_bytes())?;
        for (name, xml) in &self.parts {
            zip.add(name, xml.as_bytes())?;
        }
        zip.finish()
    }
}

/// A relationships part. `kind` is the last segment of the relationship
/// type URI; `core-properties` lives under the package namespace.
fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = format!("{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">");
    for (id, kind, target) in rels {
        let ty = if *kind == "core-properties" {
            format!("{NS_PKG_REL}/metadata/core-properties")
        } else {
            format!("{NS_REL}/{kind}")
        };
        xml.push_str(&format!(
            "<Relationship Id=\"{id}\" Type=\"{ty}\" Target=\"{target}\"/>"
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Title plus body paragraphs, from model text when present.
fn outline(fake: &mut Faker, text: Option<&str>) -> (String, Vec<String>) {
    if let Some(t) = text {
        let mut paras = paragraphs(t);
        if paras.len() > 1 {
            let title = paras.remove(0);
            return (title, paras);
        }
        if let Some(only) = paras.pop() {
            return (fake.title(), vec![only]);
        }
    }
    let title = fake.sentence(3, 7);
    let n = fake.range(2, 6);
    let body = (0..n)
        .map(|_| {
            let sentences = fake.range(2, 8);
            fake.paragraph(sentences)
        })
        .collect();
    (title.trim_end_matches('.').to_string(), body)
}

// -- Word ---------------------------------------------------------------------

fn w_para(text: &str, bold: bool, size_half_points: Option<u32>) -> String {
    let mut props = String::new();
    if bold {
        props.push_str("<w:b/>");
    }
    if let Some(sz) = size_half_points {
        props.push_str(&format!("<w:sz w:val=\"{sz}\"/>"));
    }
    let rpr = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(
        "<w:p><w:r>{rpr}<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        xml_escape(text)
    )
}

pub(super) fn docx(fake: &mut Faker, text: Option<&str>) -> io::Result<Vec<u8>> {
    let (title, body) = outline(fake, text);

    let mut xml = format!("{XML_DECL}<w:document xmlns:w=\"{NS_W}\"><w:body>");
    xml.push_str(&w_para(&title, true, Some(48)));
    for para in &body {
        xml.push_str(&w_para(para, false, None));
    }

    if text.is_none() {
        xml.push_str(&w_para(fake.word(), true, Some(32)));
        for _ in 0..fake.range(2, 5) {
            let phrase = fake.catch_phrase();
            xml.push_str(&w_para(&format!("\u{2022} {phrase}"), false, None));
        }

        let rows = 15;
        xml.push_str(
            "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>\
             <w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid>",
        );
        let header = ["Name".to_string(), "Address".to_string(), "Email".to_string()];
        for r in 0..rows {
            let cells = if r == 0 {
                header.clone()
            } else {
                [fake.name(), fake.address(), fake.email()]
            };
            xml.push_str("<w:tr>");
            for cell in &cells {
                xml.push_str(&format!("<w:tc>{}</w:tc>", w_para(cell, r == 0, None)));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
    }
    xml.push_str("<w:sectPr/></w:body></w:document>");

    let mut pkg = Package::new(fake, "word/document.xml", &title);
    pkg.part("word/document.xml", Some(CT_DOC), xml);
    pkg.finish()
}

// -- Spreadsheet --------------------------------------------------------------

enum Cell {
    Text(String),
    Number(i64),
}

impl Cell {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) => Cell::Number(n),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }
}

fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Sheet names: at most 31 chars, none of `[]:*?/\`.
fn sheet_name(raw: &str, fallback: usize) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        format!("Sheet{fallback}")
    } else {
        cleaned
    }
}

fn worksheet(rows: &[Vec<Cell>], tab_color: &str) -> String {
    let mut xml = format!(
        "{XML_DECL}<worksheet xmlns=\"{NS_S}\"><sheetPr><tabColor rgb=\"FF{}\"/></sheetPr><sheetData>",
        tab_color.trim_start_matches('#').to_ascii_uppercase()
    );
    for (r, row) in rows.iter().enumerate() {
        let rn = r + 1;
        xml.push_str(&format!("<row r=\"{rn}\">"));
        for (c, cell) in row.iter().enumerate() {
            let at = format!("{}{rn}", column_name(c));
            match cell {
                Cell::Number(n) => xml.push_str(&format!("<c r=\"{at}\"><v>{n}</v></c>")),
                Cell::Text(s) => xml.push_str(&format!(
                    "<c r=\"{at}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    xml_escape(s)
                )),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

pub(super) fn xlsx(fake: &mut Faker, text: Option<&str>) -> io::Result<Vec<u8>> {
    let mut sheets: Vec<(String, Vec<Vec<Cell>>)> = Vec::new();

    let from_text: Vec<Vec<Cell>> = text
        .map(|t| {
            t.lines()
                .map(|l| l.trim().trim_matches('|'))
                .filter(|l| !l.is_empty() && !l.starts_with("```") && !l.starts_with("---"))
                .map(|l| {
                    let sep = if l.contains('\t') {
                        '\t'
                    } else if l.contains('|') {
                        '|'
                    } else {
                        ','
                    };
                    l.split(sep).map(Cell::parse).collect()
                })
                .collect()
        })
        .unwrap_or_default();

    let title = fake.sentence(2, 5);
    if from_text.is_empty() {
        let mut rows = vec![vec![Cell::Text(fake.catch_phrase())]];
        for _ in 0..fake.range(5, 20) {
            rows.push((0..3).map(|_| Cell::Text(fake.word().to_string())).collect());
        }
        sheets.push((sheet_name(&title, 1), rows));

        for i in 1..=fake.range(1, 4) {
            let rows = (0..fake.range(10, 40))
                .map(|_| {
                    (0..fake.range(4, 12))
                        .map(|_| Cell::Number(fake.range(0, 32_000) as i64))
                        .collect()
                })
                .collect();
            sheets.push((format!("Sheet_{i}"), rows));
        }
    } else {
        sheets.push((sheet_name(&title, 1), from_text));
    }

    let mut workbook = format!(
        "{XML_DECL}<workbook xmlns=\"{NS_S}\" xmlns:r=\"{NS_REL}\"><sheets>"
    );
    let mut rels = Vec::new();
    let mut targets = Vec::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{n}\" r:id=\"rId{n}\"/>",
            xml_escape(name)
        ));
        targets.push((format!("rId{n}"), format!("worksheets/sheet{n}.xml")));
    }
    workbook.push_str("</sheets></workbook>");
    for (id, target) in &targets {
        rels.push((id.as_str(), "worksheet", target.as_str()));
    }

    let mut pkg = Package::new(fake, "xl/workbook.xml", title.trim_end_matches('.'));
    pkg.part("xl/workbook.xml", Some(CT_WORKBOOK), workbook);
    pkg.part("xl/_rels/workbook.xml.rels", None, relationships(&rels));
    for (i, (_, rows)) in sheets.iter().enumerate() {
        let color = fake.hex_color();
        pkg.part(
            &format!("xl/worksheets/sheet{}.xml", i + 1),
            Some(CT_SHEET),
            worksheet(rows, &color),
        );
    }
    pkg.finish()
}

// -- Presentation -------------------------------------------------------------

const EMPTY_TREE: &str = "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>";

fn text_box(id: u32, name: &str, (x, y, cx, cy): (u64, u64, u64, u64), paras: &[(String, u32, bool)]) -> String {
    let mut body = String::new();
    for (text, size, bold) in paras {
        body.push_str(&format!(
            "<a:p><a:r><a:rPr lang=\"en-US\" sz=\"{size}\" b=\"{}\"/><a:t>{}</a:t></a:r></a:p>",
            u8::from(*bold),
            xml_escape(text)
        ));
    }
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"/><a:lstStyle/>{body}</p:txBody></p:sp>"
    )
}

fn slide(title: &str, lines: &[String]) -> String {
    let title_box = text_box(
        2,
        "Title 1",
        (457_200, 274_638, 8_229_600, 1_143_000),
        &[(title.to_string(), 3600, true)],
    );
    let body: Vec<(String, u32, bool)> = lines.iter().map(|l| (l.clone(), 2000, false)).collect();
    let body_box = text_box(3, "Content 2", (457_200, 1_600_200, 8_229_600, 4_525_963), &body);
    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_REL}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:spTree>{EMPTY_TREE}{title_box}{body_box}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
    )
}

fn theme() -> String {
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ];
    let scheme: String = colors
        .iter()
        .map(|(n, c)| format!("<a:{n}><a:srgbClr val=\"{c}\"/></a:{n}>"))
        .collect();
    let fill = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = "<a:ln w=\"9525\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>";
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        "{XML_DECL}<a:theme xmlns:a=\"{NS_A}\" name=\"Office Theme\"><a:themeElements>\
         <a:clrScheme name=\"Office\">{scheme}</a:clrScheme>\
         <a:fontScheme name=\"Office\"><a:majorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont></a:fontScheme>\
         <a:fmtScheme name=\"Office\"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>\
         <a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>\
         <a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
         <a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme>\
         </a:themeElements></a:theme>"
    )
}

pub(super) fn pptx(fake: &mut Faker, text: Option<&str>) -> io::Result<Vec<u8>> {
    let (title, body) = outline(fake, text);

    let mut slides: Vec<String> = Vec::new();
    if text.is_some() {
        slides.push(slide(&title, &[]));
        for para in body.iter().take(12) {
            let (head, rest) = match para.split_once(". ") {
                Some((h, r)) if h.len() < 80 => (h.to_string(), vec![r.to_string()]),
                _ => (title.clone(), vec![para.clone()]),
            };
            slides.push(slide(&head, &rest));
        }
    } else {
        slides.push(slide(&title, &[fake.catch_phrase()]));
        for _ in 0..fake.range(1, 5) {
            let heading = fake.catch_phrase();
            let bullets: Vec<String> = (0..fake.range(2, 5)).map(|_| fake.catch_phrase()).collect();
            slides.push(slide(&heading, &bullets));
        }
    }

    let mut pres_rels = vec![
        ("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), "theme", "theme/theme1.xml".to_string()),
    ];
    let mut ids = String::new();
    for i in 0..slides.len() {
        let rid = format!("rId{}", i + 3);
        ids.push_str(&format!("<p:sldId id=\"{}\" r:id=\"{rid}\"/>", 256 + i));
        pres_rels.push((rid, "slide", format!("slides/slide{}.xml", i + 1)));
    }
    let presentation = format!(
        "{XML_DECL}<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_REL}\" xmlns:p=\"{NS_P}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{ids}</p:sldIdLst>\
         <p:sldSz cx=\"9144000\" cy=\"6858000\" type=\"screen4x3\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>"
    );
    let master = format!(
        "{XML_DECL}<p:sldMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_REL}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
         accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst></p:sldMaster>"
    );
    let layout = format!(
        "{XML_DECL}<p:sldLayout xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_REL}\" xmlns:p=\"{NS_P}\" type=\"blank\" preserve=\"1\">\
         <p:cSld name=\"Blank\"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
    );

    let mut pkg = Package::new(fake, "ppt/presentation.xml", &title);
    pkg.part("ppt/presentation.xml", Some(CT_PRES), presentation);
    let rel_refs: Vec<(&str, &str, &str)> = pres_rels
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    pkg.part("ppt/_rels/presentation.xml.rels", None, relationships(&rel_refs));
    pkg.part("ppt/slideMasters/slideMaster1.xml", Some(CT_MASTER), master);
    pkg.part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        None,
        relationships(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ]),
    );
    pkg.part("ppt/slideLayouts/slideLayout1.xml", Some(CT_LAYOUT), layout);
    pkg.part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        None,
        relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
    );
    pkg.part("ppt/theme/theme1.xml", Some(CT_THEME), theme());
    for (i, xml) in slides.into_iter().enumerate() {
        let n = i + 1;
        pkg.part(&format!("ppt/slides/slide{n}.xml"), Some(CT_SLIDE), xml);
        pkg.part(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            None,
            relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        );
    }
    pkg.finish()
}
