use dunia_mab::{
    keyframes::KeyframeSubsection, sections::AnimationHeader, Bones, QuaternionSample,
    SectionTable,
};
use itertools::Itertools;
use owo_colors::{OwoColorize, Stream};

pub fn print_header(header: &AnimationHeader) {
    println!(
        "{} animation, {}s",
        header.version.if_supports_color(Stream::Stdout, |t| t.blue()),
        header.length
    );
}

pub fn print_sections(sections: &SectionTable) {
    for (kind, extent) in sections.iter() {
        if extent.is_present() {
            println!("{kind} - {extent}");
        } else {
            println!(
                "{kind} - {}",
                "absent".if_supports_color(Stream::Stdout, |t| t.dimmed())
            );
        }
    }
}

pub fn print_bones(bones: &Bones) {
    println!("{} bones", bones.len());
    for (index, bone) in bones.iter().enumerate() {
        match bones.parent_of(index) {
            Some(parent) => println!("{index:>4} {} <- {}", bone.name, parent.name),
            None => println!(
                "{index:>4} {}",
                bone.name.if_supports_color(Stream::Stdout, |t| t.green())
            ),
        }
    }
}

pub fn format_sample(sample: &QuaternionSample) -> String {
    match sample.rotation {
        Some(q) => format!("{:#x} {}", sample.offset, q.euler()),
        None => format!("bad quaternion at {:#x}", sample.offset)
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
    }
}

pub fn print_root_rotations(rotations: &[QuaternionSample]) {
    println!("{} root rotations", rotations.len());
    for sample in rotations {
        println!("  {}", format_sample(sample));
    }
}

pub fn print_keyframes(keyframes: &[KeyframeSubsection]) {
    println!("{} keyframe subsections", keyframes.len());
    for subsection in keyframes {
        println!(
            "  {:#x},{} ({} quaternions)",
            subsection.start,
            subsection.size,
            subsection.samples.len()
        );
        println!(
            "{}",
            subsection
                .samples
                .iter()
                .map(|s| format!("    {}", format_sample(s)))
                .join("\n")
        );
    }
}
