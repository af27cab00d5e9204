use super::*;

#[test]
fn parses_full_job_and_fills_style_defaults() {
    let job = JobFile::from_json(
        r##"{
            "template": "t.png",
            "data": "names.csv",
            "font": "/abs/font.ttf",
            "column": "Full Name",
            "anchor": { "x": 400.0, "y": 310.5 },
            "preview": {
                "canvas_pixel_width": 800,
                "canvas_pixel_height": 566,
                "visual_width": 800.0,
                "visual_height": 566.0
            },
            "style": { "font_size": 36.0 }
        }"##,
    )
    .unwrap();

    assert_eq!(job.column.as_deref(), Some("Full Name"));
    assert_eq!(job.anchor, Some(AnchorPoint::new(400.0, 310.5)));
    assert_eq!(job.preview, Some(PreviewGeometry::unscaled(800, 566)));
    assert_eq!(job.style.font_size, 36.0);
    assert_eq!(job.style.color_hex, "#000000");
    assert!(job.out_dir.is_none());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(matches!(
        JobFile::from_json(r#"{ "templat": "typo.png" }"#),
        Err(CertError::Validation(_))
    ));
}

#[test]
fn relative_paths_resolve_against_the_job_directory() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    std::fs::write(
        &job_path,
        r#"{ "template": "assets/t.png", "font": "/abs/font.ttf", "out_dir": "out" }"#,
    )
    .unwrap();

    let job = JobFile::from_path(&job_path).unwrap();
    assert_eq!(job.template, Some(dir.path().join("assets/t.png")));
    assert_eq!(job.font, Some(PathBuf::from("/abs/font.ttf")));
    assert_eq!(job.out_dir, Some(dir.path().join("out")));
    assert!(job.data.is_none());
}

#[test]
fn unset_inputs_load_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("names.csv");
    std::fs::write(&csv, "Full Name,Email\nAda,a@x\n").unwrap();

    let job = JobFile {
        data: Some(csv),
        ..JobFile::default()
    };
    let inputs = job.load_inputs().unwrap();
    assert!(inputs.template.is_none());
    assert!(inputs.font.is_none());
    assert_eq!(inputs.table.unwrap().len(), 1);
}

#[test]
fn missing_referenced_file_is_an_error() {
    let job = JobFile {
        template: Some(PathBuf::from("does/not/exist.png")),
        ..JobFile::default()
    };
    let err = job.load_inputs().unwrap_err();
    assert!(err.to_string().contains("does/not/exist.png"));
}
