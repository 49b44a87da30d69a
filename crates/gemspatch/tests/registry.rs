use gemspatch::{Format, PatchError, RawInstrument, format_by_name, format_name, format_size};

#[test]
fn test_registry_by_id() {
    let expected = [
        (0u8, "GEMS", 39usize),
        (1, "TYI", 32),
        (2, "TFI", 42),
        (3, "EIF", 29),
        (4, "Y12", 128),
        (5, "VGI", 43),
        (6, "DMP", 51),
        (7, "DMP0", 49),
        (8, "SMPS", 25),
    ];
    for &(id, name, size) in &expected {
        assert_eq!(format_name(id), Some(name));
        assert_eq!(format_size(id), Some(size));
        assert_eq!(format_by_name(name), Some(id));
        assert_eq!(format_by_name(&name.to_ascii_lowercase()), Some(id));
    }
    assert_eq!(format_name(9), None);
    assert_eq!(format_size(9), None);
    assert_eq!(format_by_name("XYZ"), None);
}

#[test]
fn test_dispatch_matches_direct_calls() {
    let mut inst = RawInstrument::default();
    inst.set_alg_fb(2, 5);
    inst.set_ams_fms(1, 3);
    inst.op[2].reg40 = 0x33;

    assert_eq!(inst.export(Format::Gems), inst.export_gems().to_vec());
    assert_eq!(inst.export(Format::Tyi), inst.export_tyi().to_vec());
    assert_eq!(inst.export(Format::Tfi), inst.export_tfi().to_vec());
    assert_eq!(inst.export(Format::Eif), inst.export_eif().to_vec());
    assert_eq!(inst.export(Format::Y12), inst.export_y12().to_vec());
    assert_eq!(inst.export(Format::Vgi), inst.export_vgi().to_vec());
    assert_eq!(inst.export(Format::Dmp), inst.export_dmp().to_vec());
    assert_eq!(inst.export(Format::Dmp0), inst.export_dmp_v0().to_vec());
    assert_eq!(inst.export(Format::Smps), inst.export_smps().to_vec());

    for format in Format::ALL {
        let bytes = inst.export_by_id(format.id()).unwrap();
        assert_eq!(bytes.len(), format.size());
        assert_eq!(
            RawInstrument::import_by_id(format.id(), &bytes),
            RawInstrument::import(format, &bytes)
        );
    }
}

#[test]
fn test_both_dmp_entries_detect_version() {
    let inst = RawInstrument::default();
    let v5 = inst.export(Format::Dmp);
    let v0 = inst.export(Format::Dmp0);
    assert_eq!(v5.len(), 51);
    assert_eq!(v0.len(), 49);
    // either entry accepts either version
    assert!(RawInstrument::import(Format::Dmp, &v0).is_ok());
    assert!(RawInstrument::import(Format::Dmp0, &v5).is_ok());
}

#[test]
fn test_short_buffers_are_rejected() {
    for format in Format::ALL {
        let mut short = vec![0u8; format.size() - 1];
        if format == Format::Dmp {
            // a zeroed buffer would read as a complete v0 preset
            short[0] = 0x05;
        }
        match RawInstrument::import(format, &short) {
            Err(PatchError::BufferTooShort {
                needed, available, ..
            }) => {
                assert_eq!(needed, format.size(), "{}", format);
                assert_eq!(available, format.size() - 1);
            }
            other => panic!("{}: expected BufferTooShort, got {:?}", format, other),
        }
        assert!(RawInstrument::import(format, &[]).is_err());
    }
}

#[test]
fn test_unknown_name_error_message() {
    let err = "opn".parse::<Format>().unwrap_err();
    assert_eq!(err.to_string(), "unknown format name: \"opn\"");
    let err = Format::try_from(12).unwrap_err();
    assert_eq!(err.to_string(), "unknown format id: 12");
}
