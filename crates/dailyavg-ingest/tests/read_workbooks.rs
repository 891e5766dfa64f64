//! Integration tests for workbook reading: fixtures written with
//! rust_xlsxwriter, read back through the public entry points.

use dailyavg_core::ReportConfig;
use dailyavg_ingest::{read_export, read_forecast};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

#[test]
fn read_export_normalizes_a_real_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for r in 0..6u32 {
        worksheet.write(r, 0, "banner").unwrap();
    }
    let headers = ["Shop", "Goods", "Business Date", "Net Sales", "Item Qty"];
    for (c, header) in headers.iter().enumerate() {
        worksheet.write(6, c as u16, *header).unwrap();
    }
    worksheet.write(7, 0, "Outlet: X-KOMUGI-Bakery").unwrap();
    worksheet.write(7, 1, "SKU001-Croissant").unwrap();
    worksheet.write(7, 2, "2026-08-24").unwrap();
    worksheet.write(7, 3, 10.0).unwrap();
    worksheet.write(7, 4, 5.0).unwrap();
    // Continuation row: outlet and item inherited.
    worksheet.write(8, 2, "2026-08-25").unwrap();
    worksheet.write(8, 3, 12.0).unwrap();
    worksheet.write(8, 4, 6.0).unwrap();
    workbook.save(&path).unwrap();

    let records = read_export(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].outlet, "Outlet: X-KOMUGI-Bakery");
    assert_eq!(records[1].item, "SKU001-Croissant");
    assert_eq!(records[1].item_qty, 6.0);
}

#[test]
fn read_forecast_records_missing_sheets_per_outlet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("MV").unwrap();
    let headers = ["Item Name", "Mon-Thu", "Fri", "Sat", "Sun"];
    for (c, header) in headers.iter().enumerate() {
        worksheet.write(0, c as u16, *header).unwrap();
    }
    worksheet.write(1, 0, "Croissant").unwrap();
    worksheet.write(1, 1, 8.0).unwrap();
    worksheet.write(1, 2, 12.0).unwrap();
    worksheet.write(1, 3, 9.0).unwrap();
    worksheet.write(1, 4, 7.0).unwrap();
    workbook.save(&path).unwrap();

    let config = ReportConfig::default();
    let set = read_forecast(&path, &config).unwrap();

    // MV parses (split weekday mean of 8 and 12); the other 13 codes have
    // no sheet and land in the error map without failing the workbook.
    let mv = &set.outlets["MV"];
    assert_eq!(mv[0].qty, 10.0);
    assert_eq!(set.errors.len(), 13);
    assert!(set.errors["PV"].contains("PV"));
}
