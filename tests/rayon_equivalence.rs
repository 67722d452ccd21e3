#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tinydet::{Decoder, ModelConfig, TensorLayout};

fn random_tensor(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-5.0f32..5.0)).collect()
}

#[test]
fn parallel_decode_matches_sequential() {
    for layout in [TensorLayout::CellMajor, TensorLayout::ChannelMajor] {
        let decoder = Decoder::new(ModelConfig::default().with_layout(layout)).unwrap();
        for (seed, threshold) in [(3u64, 0.0f32), (4, 0.1), (5, 0.3)] {
            let tensor = random_tensor(decoder.tensor_len(), seed);
            let seq = decoder.decode(&tensor, threshold).unwrap();
            let par = decoder.decode_par(&tensor, threshold).unwrap();
            assert_eq!(seq, par);
        }
    }
}

#[test]
fn parallel_decode_reports_shape_errors() {
    let decoder = Decoder::new(ModelConfig::default()).unwrap();
    let err = decoder.decode_par(&[0.0; 10], 0.3).err().unwrap();
    assert_eq!(err, decoder.decode(&[0.0; 10], 0.3).err().unwrap());
}
