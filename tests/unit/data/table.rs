use super::*;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn auto_select_prefers_name_like_headers() {
    assert_eq!(
        select_name_column(&cols(&["Full Name", "Email"])),
        Some("Full Name")
    );
    assert_eq!(
        select_name_column(&cols(&["Email", "NAMA_PESERTA"])),
        Some("NAMA_PESERTA")
    );
    assert_eq!(
        select_name_column(&cols(&["id", "Fullname", "name"])),
        Some("Fullname")
    );
}

#[test]
fn auto_select_falls_back_to_first_column() {
    assert_eq!(select_name_column(&cols(&["Email", "Score"])), Some("Email"));
    assert_eq!(select_name_column(&[]), None);
}

#[test]
fn parses_header_rows_and_skips_blank_lines() {
    let csv = "Full Name,Email\nAda Lovelace,ada@example.com\n\nAlan Turing,alan@example.com\n";
    let table = Table::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.columns(), &cols(&["Full Name", "Email"])[..]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1]["Full Name"], "Alan Turing");
}

#[test]
fn records_of_empty_fields_are_kept_as_rows() {
    let csv = "name,email\n,\nAda,a@example.com\n";
    let table = Table::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0]["name"], "");
    assert_eq!(table.rows()[1]["name"], "Ada");
}

#[test]
fn short_records_lack_trailing_columns() {
    let csv = "Email,Name\nx@example.com\ny@example.com,Yan\n";
    let table = Table::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.len(), 2);
    assert!(!table.rows()[0].contains_key("Name"));
    assert_eq!(table.rows()[1]["Name"], "Yan");
}

#[test]
fn quoted_fields_keep_commas() {
    let csv = "name\n\"Doe, Jane\"\n";
    let table = Table::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.rows()[0]["name"], "Doe, Jane");
}

#[test]
fn resolve_name_column_validates_requested_column() {
    let table = Table::new(cols(&["Email", "Name"]), vec![]);
    assert_eq!(table.resolve_name_column(None).unwrap(), "Name");
    assert_eq!(table.resolve_name_column(Some("Email")).unwrap(), "Email");
    assert!(matches!(
        table.resolve_name_column(Some("Phone")),
        Err(CertError::MissingInput(_))
    ));
    assert!(matches!(
        table.resolve_name_column(Some("")),
        Err(CertError::MissingInput(_))
    ));
    assert!(matches!(
        Table::default().resolve_name_column(None),
        Err(CertError::MissingInput(_))
    ));
}
