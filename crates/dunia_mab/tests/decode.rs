use std::io::Cursor;

use dunia_mab::error::{Error, Result};
use dunia_mab::{Bone, DecodeOptions, Decoder, Extent, FormatVersion, ModelFormat};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

const IDENTITY: [u8; 6] = [0x00, 0xC0, 0x00, 0xC0, 0x00, 0x40];
const X_AXIS: [u8; 6] = [0x00, 0x40, 0x00, 0x40, 0x00, 0x40];
const INVALID: [u8; 6] = [0xFF, 0x7F, 0xFF, 0x7F, 0xFF, 0x7F];

const HEADER_SIZE: usize = 236;

/// Lays out a MAB file with every mandatory section and optionally an events section
fn mab(version: u8, length: f32, rotation: &[u8], keyframes: &[u8], events: Option<&[u8]>) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_SIZE];
    data[0] = version;
    data[196..200].copy_from_slice(&length.to_le_bytes());

    let mut place = |body: &[u8]| -> i32 {
        let offset = data.len() as i32;
        data.extend(body);
        offset - 16
    };

    let unknown1 = place(&[0xAA; 4]);
    let unknown2 = place(&[0xBB; 4]);
    let rotation = place(rotation);
    let keyframes = place(keyframes);
    let unknown3 = place(&[0xCC; 4]);
    let offsets = place(&[0xDD; 4]);
    let events = events.map_or(0, &mut place);
    let unknown5 = place(&[0xEE; 4]);

    let stored = [
        unknown2, unknown1, rotation, keyframes, unknown3, offsets, events, 0, unknown5,
    ];
    for (i, offset) in stored.iter().enumerate() {
        let at = 200 + i * 4;
        data[at..at + 4].copy_from_slice(&offset.to_le_bytes());
    }

    data
}

fn rotations(samples: &[[u8; 6]]) -> Vec<u8> {
    let mut data = (samples.len() as i32).to_le_bytes().to_vec();
    data.extend([0u8; 4]);
    for sample in samples {
        data.extend(sample);
    }
    data
}

/// Keyframe section with a zero scale, so the directory is just the payload size
fn empty_keyframes() -> Vec<u8> {
    let mut data = vec![0u8; 4];
    data.extend(0.0f32.to_le_bytes());
    data.extend(0i32.to_le_bytes());
    data.extend(0i32.to_le_bytes());
    data
}

/// Two subsections, sized for a scale of 8 over one second
fn two_subsections() -> Vec<u8> {
    let mut data = vec![0u8; 4];
    data.extend(8.0f32.to_le_bytes());
    for boundary in [20i32, 28, 42] {
        data.extend(boundary.to_le_bytes());
    }

    data.extend(IDENTITY);
    data.extend(0u16.to_le_bytes());

    data.extend(X_AXIS);
    data.extend(1u16.to_le_bytes());
    data.extend(INVALID);
    data
}

fn skeleton(names: &[&str]) -> Vec<u8> {
    let mut data = b"SKL\x01".to_vec();
    data.extend((names.len() as u32).to_le_bytes());
    for name in names {
        data.extend((name.len() as u32).to_le_bytes());
        data.extend(name.as_bytes());
        data.extend([0u8; 40]);
    }
    data
}

fn mesh(bones: &[(&str, i32)]) -> Vec<u8> {
    let mut data = b"HSEM".to_vec();
    data.extend(45u16.to_le_bytes());
    data.extend(0u16.to_le_bytes());
    data.resize(28, 0);
    data.extend(1u32.to_le_bytes());

    let mut body = (bones.len() as u32).to_le_bytes().to_vec();
    for (name, parent) in bones {
        body.extend([0u8; 12]);
        body.extend(parent.to_le_bytes());
        body.extend([0u8; 52]);
        body.extend((name.len() as u32).to_le_bytes());
        body.extend(name.as_bytes());
        body.push(0);
    }

    data.extend(b"EDON");
    data.extend(0u32.to_le_bytes());
    data.extend((body.len() as u32 + 20).to_le_bytes());
    data.extend(0u64.to_le_bytes());
    data.extend(body);
    data
}

#[traced_test]
#[test]
fn decode_minimal_files() -> Result<()> {
    let animation = mab(0x61, 0.0, &rotations(&[]), &empty_keyframes(), None);
    let result = Decoder::default().decode(Cursor::new(animation), Cursor::new(skeleton(&[])))?;

    assert_eq!(result.header.version, FormatVersion::FarCry3);
    assert_eq!(result.header.length, 0.0);
    assert!(result.bones.is_empty());
    assert!(result.root_rotations.is_empty());
    assert!(result.keyframes.is_empty());
    assert_eq!(result.invalid_count(), 0);
    assert!(!logs_contain("bad quaternion"));

    Ok(())
}

#[traced_test]
#[test]
fn decode_animation_with_mesh() -> Result<()> {
    let animation = mab(
        0x61,
        1.0,
        &rotations(&[IDENTITY, INVALID]),
        &two_subsections(),
        None,
    );
    let model = mesh(&[("Bip01", -1), ("Bip01_Pelvis", 0), ("Bip01_Spine", 1)]);

    let result = Decoder::default().decode(Cursor::new(animation), Cursor::new(model))?;

    assert_eq!(result.header.length, 1.0);
    assert_eq!(result.sections.rotation, Extent::new(244, 20));
    assert_eq!(result.sections.keyframes, Extent::new(264, 42));
    assert_eq!(result.sections.unknown5, Extent::new(314, 4));
    assert!(!result.sections.events.is_present());
    assert!(!result.sections.unknown4.is_present());

    assert_eq!(
        result.bones.iter().cloned().collect::<Vec<_>>(),
        vec![
            Bone {
                name: "Bip01".into(),
                parent: None
            },
            Bone {
                name: "Bip01_Pelvis".into(),
                parent: Some(0)
            },
            Bone {
                name: "Bip01_Spine".into(),
                parent: Some(1)
            },
        ]
    );

    assert_eq!(
        result
            .root_rotations
            .iter()
            .map(|r| (r.offset, r.is_valid()))
            .collect::<Vec<_>>(),
        vec![(252, true), (258, false)]
    );

    assert_eq!(
        result
            .keyframes
            .iter()
            .map(|k| (k.start, k.size, k.samples.len()))
            .collect::<Vec<_>>(),
        vec![(20, 8, 1), (28, 14, 2)]
    );
    assert!(result.keyframes[1].samples[0]
        .rotation
        .is_some_and(|q| q.x > 0.9999));

    assert_eq!(result.invalid_count(), 2);
    assert!(logs_contain("bad quaternion at 0x102"));
    assert!(logs_contain("bad quaternion at 0x12c"));

    Ok(())
}

#[test]
fn decode_with_events_section() -> Result<()> {
    let animation = mab(
        0x61,
        0.0,
        &rotations(&[]),
        &empty_keyframes(),
        Some(&[0x01; 12][..]),
    );
    let result = Decoder::default().decode(
        Cursor::new(animation),
        Cursor::new(skeleton(&["Bip01"])),
    )?;

    assert_eq!(result.sections.offsets, Extent::new(272, 4));
    assert_eq!(result.sections.events, Extent::new(276, 12));
    assert_eq!(result.sections.unknown5, Extent::new(288, 4));
    assert_eq!(result.bones.len(), 1);

    Ok(())
}

#[test]
fn unsupported_version() {
    let animation = mab(0x81, 0.0, &rotations(&[]), &empty_keyframes(), None);

    assert!(matches!(
        Decoder::default().decode(Cursor::new(animation), Cursor::new(skeleton(&[]))),
        Err(Error::UnsupportedVersion(FormatVersion::FarCry4))
    ));
}

#[test]
fn unknown_version() {
    let animation = mab(0x00, 0.0, &rotations(&[]), &empty_keyframes(), None);

    assert!(matches!(
        Decoder::default().decode(Cursor::new(animation), Cursor::new(skeleton(&[]))),
        Err(Error::UnknownFormat(0x00))
    ));
}

#[test]
fn model_format_override() {
    let animation = mab(0x61, 0.0, &rotations(&[]), &empty_keyframes(), None);
    let decoder = Decoder::new(
        DecodeOptions::builder()
            .model_format(ModelFormat::Mesh)
            .build(),
    );

    assert!(matches!(
        decoder.decode(Cursor::new(animation), Cursor::new(skeleton(&[]))),
        Err(Error::InvalidSignature { offset: 0, .. })
    ));
}

#[test]
fn unrecognised_model() {
    let animation = mab(0x61, 0.0, &rotations(&[]), &empty_keyframes(), None);

    assert!(matches!(
        Decoder::default().decode(Cursor::new(animation), Cursor::new(b"RIFF".to_vec())),
        Err(Error::InvalidSignature { offset: 0, .. })
    ));
}
