use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod unpack {
    use divan::Bencher;
    use dunia_mab::quaternion::{unpack, PackedQuaternion};

    fn get_input() -> Vec<PackedQuaternion> {
        (0..4096u32)
            .map(|i| {
                let a = (i.wrapping_mul(2654435761) >> 16) as u16;
                let b = (i.wrapping_mul(40503) >> 3) as u16;
                PackedQuaternion::new(a, b, (i as i16).wrapping_mul(7))
            })
            .collect()
    }

    #[divan::bench]
    fn single() {
        divan::black_box(unpack(
            divan::black_box(0xC000),
            divan::black_box(0xC000),
            divan::black_box(0x4000),
        ));
    }

    #[divan::bench]
    fn batch(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|packed| {
            packed
                .iter()
                .filter_map(PackedQuaternion::unpack)
                .for_each(|q| {
                    divan::black_box(q);
                });
        });
    }
}

pub mod read {
    use divan::Bencher;
    use dunia_mab::cursor::ByteCursor;
    use dunia_mab::quaternion::QuaternionSample;
    use std::io::Cursor;

    fn get_input() -> Vec<u8> {
        [0x00, 0xC0, 0x00, 0xC0, 0x00, 0x40].repeat(4096)
    }

    #[divan::bench]
    fn samples(bencher: Bencher) {
        bencher
            .with_inputs(|| ByteCursor::new(Cursor::new(get_input())).unwrap())
            .bench_local_refs(|cursor| {
                for _ in 0..4096 {
                    divan::black_box(QuaternionSample::read(cursor).unwrap());
                }
            });
    }
}
