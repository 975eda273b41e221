use stockpivot_core::{
    Category, FileOutcome, InputFile, NetworkMode, PivotError, Severity, StockPivot,
};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Fixture cell
enum Fx<'a> {
    S(&'a str),
    N(f64),
    E,
}

use Fx::{E, N, S};

fn col_letter(col: usize) -> String {
    let mut col = col as u32;
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// Helper to create a minimal valid XLSX file in memory
fn create_mock_xlsx(rows: &[Vec<Fx>]) -> anyhow::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#
            .as_bytes(),
    )?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Остатки" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
            .as_bytes(),
    )?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#.as_bytes())?;

    let mut sheet_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet_xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", col_letter(c), r + 1);
            match cell {
                S(s) => sheet_xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(s)
                )),
                N(n) => sheet_xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
                E => {}
            }
        }
        sheet_xml.push_str("</row>");
    }
    sheet_xml.push_str("</sheetData></worksheet>");

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet_xml.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn header() -> Vec<Fx<'static>> {
    vec![
        S("Сеть"),
        S("Адрес торгового объекта"),
        S("Описание номенклатуры"),
        S("Штрих_код"),
        S("Остаток"),
    ]
}

fn network_file(name: &str, network: &'static str, addresses: &[&'static str]) -> anyhow::Result<InputFile> {
    let mut rows = vec![vec![S("Отчёт об остатках")], header()];
    for (i, address) in addresses.iter().copied().enumerate() {
        rows.push(vec![
            S(network),
            S(address),
            S("Чай Тесс Лайм"),
            N(4600000100000.0 + (i as f64) * 10.0),
            N(3.0),
        ]);
    }
    Ok(InputFile::new(name, create_mock_xlsx(&rows)?))
}

#[test]
fn test_header_marker_on_fourth_row() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[
        vec![S("Остатки товаров")],
        vec![E],
        vec![S("Период:"), S("март")],
        header(),
        vec![S("Гринн"), S("ул. Ленина, 1"), S("Чай Тесс"), N(4600000123456.0), N(5.0)],
        vec![S("Гринн"), S("ул. Ленина, 1"), S("Чай ГринФилд"), N(4600000654321.0), N(0.0)],
    ])?;

    let pivot = StockPivot::new().with_mode(NetworkMode::None);
    let outcome = pivot.process_file(&InputFile::new("grinn.xlsx", bytes))?;

    let rows = outcome.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].address, "ул. Ленина, 1");
    assert_eq!(rows[0].category, Category::Tess);
    assert_eq!(rows[0].codes, "2345");
    assert_eq!(rows[0].network, None);

    Ok(())
}

#[test]
fn test_text_cells_and_comma_decimals() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[
        header(),
        vec![S("Санта"), S("пр. Мира, 5"), S("Кофе Жардин раств. 95г"), S("4600000777771"), S("0,5")],
        vec![S("Санта"), S("пр. Мира, 5"), S("Кофе Жардин раств. 75г"), S("не указан"), S("2")],
        vec![S("Санта"), S("пр. Мира, 5"), S("Кофе Жардин зерно"), S("4600000888881"), S("-1")],
        vec![S("Санта"), S("пр. Мира, 5"), N(12.0), N(4600000999991.0), E],
    ])?;

    let outcome = StockPivot::new().process_file(&InputFile::new("santa.xlsx", bytes))?;
    match outcome {
        FileOutcome::Aggregated { network, rows } => {
            assert_eq!(network.as_deref(), Some("Санта"));
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].category, Category::JardinSolution);
            assert_eq!(rows[0].codes, "7777, 0000");
        }
        FileOutcome::Empty => panic!("expected aggregated rows"),
    }

    Ok(())
}

#[test]
fn test_missing_stock_column() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[
        vec![S("Сеть"), S("Адрес торгового объекта"), S("Описание номенклатуры"), S("Штрих_код")],
        vec![S("Гринн"), S("ул. Ленина, 1"), S("Чай Тесс"), N(4600000123456.0)],
    ])?;
    let file = InputFile::new("no_stock.xlsx", bytes);

    let pivot = StockPivot::new();
    let err = pivot.process_file(&file).unwrap_err();
    assert_eq!(err, PivotError::MissingRequiredColumn("Остаток".to_string()));

    let good = network_file("good.xlsx", "Гринн", &["ул. Ленина, 1"])?;
    let report = pivot.process_batch(&[file, good]);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].network.as_deref(), Some("Гринн"));

    let failure = report
        .notices
        .iter()
        .find(|n| n.severity == Severity::Error)
        .expect("missing column is reported");
    assert_eq!(failure.file.as_deref(), Some("no_stock.xlsx"));
    assert_eq!(failure.message, "missing column: Остаток");

    Ok(())
}

#[test]
fn test_missing_marker_is_a_warning() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[
        vec![S("Network"), S("Address")],
        vec![S("A"), S("Main st")],
    ])?;

    let report = StockPivot::new().process_batch(&[InputFile::new("english.xlsx", bytes)]);
    assert!(!report.has_rows());
    assert!(report.notices.iter().any(|n| {
        n.file.as_deref() == Some("english.xlsx") && n.severity == Severity::Warning
    }));
    // Nothing found is reported once for the whole batch
    assert_eq!(report.notices.iter().filter(|n| n.file.is_none()).count(), 1);

    Ok(())
}

#[test]
fn test_two_networks_sorted_by_network_and_address() -> anyhow::Result<()> {
    let files = vec![
        network_file("b.xlsx", "B", &["ул. Садовая, 3", "ул. Ленина, 1"])?,
        network_file("a.xlsx", "A", &["ул. Садовая, 3", "ул. Ленина, 1"])?,
    ];

    let report = StockPivot::new().process_batch(&files);
    let keys: Vec<_> = report
        .rows
        .iter()
        .map(|r| (r.network.as_deref().unwrap_or_default(), r.address.as_str()))
        .collect();

    assert_eq!(
        keys,
        vec![
            ("A", "ул. Ленина, 1"),
            ("A", "ул. Садовая, 3"),
            ("B", "ул. Ленина, 1"),
            ("B", "ул. Садовая, 3"),
        ]
    );
    assert_eq!(report.error_count(), 0);

    Ok(())
}

#[test]
fn test_single_network_mode_merges_files_without_network() -> anyhow::Result<()> {
    let files = vec![
        network_file("b.xlsx", "B", &["ул. Ленина, 1"])?,
        network_file("a.xlsx", "A", &["ул. Ленина, 1"])?,
    ];

    let report = StockPivot::new()
        .with_mode(NetworkMode::None)
        .process_batch(&files);

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.network.is_none()));

    Ok(())
}

#[test]
fn test_empty_file_is_not_an_error() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[
        header(),
        vec![S("Гринн"), S("ул. Ленина, 1"), S("Чай Тесс"), N(4600000123456.0), N(0.0)],
    ])?;
    let empty = InputFile::new("empty.xlsx", bytes);
    let good = network_file("good.xlsx", "Гринн", &["ул. Ленина, 1"])?;

    let pivot = StockPivot::new();
    assert_eq!(pivot.process_file(&empty)?, FileOutcome::Empty);

    let report = pivot.process_batch(&[empty, good]);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.count(Severity::Warning), 0);

    Ok(())
}
