use gemspatch::bitfield::REG60;
use gemspatch::{Format, GemsPatch, PatchError, RawFmOperator, RawInstrument, convert};

#[test]
fn test_gems_operator_permutation() {
    let mut inst = RawInstrument::default();
    for (slot, ar) in [1u8, 2, 3, 4].iter().enumerate() {
        inst.op[slot].reg50 = *ar;
    }
    let bytes = inst.export(Format::Gems);
    let on_disk: Vec<u8> = (0..4).map(|d| bytes[5 + d * 6 + 2] & 0x1F).collect();
    assert_eq!(on_disk, vec![1, 3, 2, 4]);

    let GemsPatch::Fm(fm) = GemsPatch::decode(&bytes).unwrap() else {
        panic!("expected an FM patch");
    };
    let ars: Vec<u8> = fm.op.iter().map(|op| op.ar).collect();
    assert_eq!(ars, vec![1, 2, 3, 4]);
}

#[test]
fn test_dmp_version_detection() {
    let mut v0 = [0u8; 49];
    v0[1] = 0x01;
    v0[4] = 5;
    let inst = RawInstrument::import(Format::Dmp, &v0).unwrap();
    assert_eq!(inst.alg(), 5);

    let mut v5 = [0u8; 51];
    v5[0] = 0x05;
    v5[1] = 0x02;
    v5[2] = 0x01;
    v5[5] = 3;
    v5[6] = 2;
    let inst = RawInstrument::import(Format::Dmp, &v5).unwrap();
    assert_eq!(inst.alg(), 3);
    assert_eq!(inst.ams(), 2);

    let mut bad = v5;
    bad[0] = 0x0B;
    assert_eq!(
        RawInstrument::import(Format::Dmp, &bad),
        Err(PatchError::UnsupportedVersion(0x0B))
    );
}

#[test]
fn test_tfi_to_vgi_to_canonical() {
    let mut tfi = [0u8; 42];
    tfi[0] = 2; // ALG
    tfi[1] = 6; // FB
    for disk in 0..4 {
        let off = 2 + disk * 10;
        tfi[off..off + 10].copy_from_slice(&[
            disk as u8 + 1, // MUL
            3,              // DT: centered, none
            0x10 + disk as u8,
            1,
            0x1F,
            0x0A,
            0x05,
            0x07,
            0x02,
            0x00,
        ]);
    }
    let from_tfi = RawInstrument::import(Format::Tfi, &tfi).unwrap();

    let vgi = convert(Format::Tfi, Format::Vgi, &tfi).unwrap();
    assert_eq!(vgi.len(), 43);
    assert_eq!(&vgi[..3], &[2, 6, 0x00]);
    // VGI stores the register DT, which is 0 for centered 3
    assert_eq!(vgi[3 + 1], 0);

    let from_vgi = RawInstrument::import(Format::Vgi, &vgi).unwrap();
    assert_eq!(from_vgi, from_tfi);
    assert_eq!(from_vgi.export_tfi(), tfi);
}

#[test]
fn test_smps_keeps_only_what_it_carries() {
    let mut inst = RawInstrument {
        reg_b0: 0x3B,
        reg_b4: 0x45,
        reg22: 0x0A,
        reg28: 0x30,
        reg27: 0x40,
        ch3_freq: [1, 2, 3, 4],
        ..Default::default()
    };
    for (slot, op) in inst.op.iter_mut().enumerate() {
        let n = slot as u8;
        *op = RawFmOperator::from_registers([
            0x10 + n,
            0x20 + n,
            0x1F,
            REG60.pack([1, 0, 0x08 + n]),
            0x0C,
            0x5A,
            0x0E,
        ]);
    }

    let back = RawInstrument::import(Format::Smps, &inst.export(Format::Smps)).unwrap();
    assert_eq!(back.reg_b0, inst.reg_b0);
    for (a, b) in back.op.iter().zip(inst.op.iter()) {
        assert_eq!(a.reg30, b.reg30);
        assert_eq!(a.reg40, b.reg40);
        assert_eq!(a.reg50, b.reg50);
        assert_eq!(a.reg60, b.reg60);
        assert_eq!(a.reg80, b.reg80);
        assert_eq!(a.reg70, 0);
        assert_eq!(a.reg90, 0);
    }
    let defaults = RawInstrument::default();
    assert_eq!(back.reg_b4, defaults.reg_b4);
    assert_eq!(back.reg22, defaults.reg22);
    assert_eq!(back.reg28, defaults.reg28);
    assert_eq!(back.reg27, defaults.reg27);
    assert_eq!(back.ch3_freq, defaults.ch3_freq);
}

#[test]
fn test_gems_psg_patch_is_not_fm() {
    let bytes = [2u8, 0, 0x10, 0x0F, 0x0F, 0x02, 0x20];
    match GemsPatch::decode(&bytes).unwrap() {
        GemsPatch::Psg { noise, psg } => {
            assert!(!noise);
            assert_eq!(psg.rr, 0x20);
        }
        GemsPatch::Fm(_) => panic!("expected a PSG patch"),
    }
    assert_eq!(
        GemsPatch::decode(&[1u8; 39]),
        Err(PatchError::UnsupportedPatchType(1))
    );
}
