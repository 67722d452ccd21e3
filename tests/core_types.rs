use tinydet::lowlevel::{DetectionTensor, TensorShape};
use tinydet::{
    Anchor, AnchorTable, ConfigIssue, Decoder, LabelTable, ModelConfig, TensorLayout,
    TinyDetError,
};

#[test]
fn decoder_rejects_anchor_table_mismatch() {
    let cfg = ModelConfig {
        anchors: AnchorTable::from_pairs(&[(1.0, 1.0), (2.0, 2.0)]),
        ..ModelConfig::default()
    };
    let err = Decoder::new(cfg).err().unwrap();
    assert_eq!(
        err,
        TinyDetError::InvalidConfiguration(ConfigIssue::AnchorCount {
            expected: 5,
            got: 2,
        })
    );
}

#[test]
fn decoder_rejects_label_table_mismatch() {
    let cfg = ModelConfig {
        labels: LabelTable::from_strs(&["person"]),
        ..ModelConfig::default()
    };
    let err = Decoder::new(cfg).err().unwrap();
    assert_eq!(
        err,
        TinyDetError::InvalidConfiguration(ConfigIssue::LabelCount {
            expected: 20,
            got: 1,
        })
    );
}

#[test]
fn decoder_rejects_zero_dimensions() {
    for (cfg, name) in [
        (
            ModelConfig {
                grid_size: 0,
                ..ModelConfig::default()
            },
            "grid_size",
        ),
        (
            ModelConfig {
                input_size: 0,
                ..ModelConfig::default()
            },
            "input_size",
        ),
        (
            ModelConfig {
                num_anchors: 0,
                anchors: AnchorTable::default(),
                ..ModelConfig::default()
            },
            "num_anchors",
        ),
        (
            ModelConfig {
                num_classes: 0,
                labels: LabelTable::default(),
                ..ModelConfig::default()
            },
            "num_classes",
        ),
    ] {
        let err = Decoder::new(cfg).err().unwrap();
        assert_eq!(
            err,
            TinyDetError::InvalidConfiguration(ConfigIssue::ZeroDimension { name })
        );
    }
}

#[test]
fn decoder_rejects_bad_anchor() {
    let mut anchors: Vec<Anchor> = ModelConfig::default().anchors.to_vec();
    anchors[3] = Anchor::new(f32::NAN, 1.0);
    let cfg = ModelConfig {
        anchors: AnchorTable::new(anchors),
        ..ModelConfig::default()
    };
    let err = Decoder::new(cfg).err().unwrap();
    assert_eq!(
        err,
        TinyDetError::InvalidConfiguration(ConfigIssue::InvalidAnchor { index: 3 })
    );
}

#[test]
fn decode_rejects_wrong_tensor_length() {
    let decoder = Decoder::new(ModelConfig::default()).unwrap();
    assert_eq!(decoder.tensor_len(), 21125);

    for len in [0usize, 21124, 21126] {
        let tensor = vec![0.0f32; len];
        let err = decoder.decode(&tensor, 0.3).err().unwrap();
        assert_eq!(
            err,
            TinyDetError::InvalidTensorShape {
                expected: 21125,
                got: len,
            }
        );
    }
}

#[test]
fn custom_geometry_changes_expected_length() {
    let cfg = ModelConfig {
        grid_size: 4,
        input_size: 128,
        num_anchors: 2,
        num_classes: 3,
        anchors: AnchorTable::from_pairs(&[(1.0, 1.0), (2.0, 3.0)]),
        labels: LabelTable::from_strs(&["a", "b", "c"]),
        layout: TensorLayout::CellMajor,
    };
    let decoder = Decoder::new(cfg).unwrap();
    assert_eq!(decoder.tensor_len(), 4 * 4 * 2 * 8);
    assert!(decoder.decode(&vec![0.0; 256], 0.5).unwrap().is_empty());
}

#[test]
fn tensor_view_reads_logical_values_in_both_layouts() {
    let cfg = ModelConfig::default();
    let cell = TensorShape::from_config(&cfg);
    let planar = TensorShape::from_config(&cfg.clone().with_layout(TensorLayout::ChannelMajor));

    let mut cell_data = vec![0.0f32; cell.len()];
    let mut planar_data = vec![0.0f32; planar.len()];
    cell_data[cell.index(3, 9, 2, 17)] = 4.5;
    planar_data[planar.index(3, 9, 2, 17)] = 4.5;

    let cell_view = DetectionTensor::new(&cell_data, cell).unwrap();
    let planar_view = DetectionTensor::new(&planar_data, planar).unwrap();
    assert_eq!(cell_view.get(3, 9, 2, 17), Some(4.5));
    assert_eq!(planar_view.get(3, 9, 2, 17), Some(4.5));
    assert_eq!(planar_view.get(3, 9, 2, 16), Some(0.0));
    assert_eq!(cell.num_classes(), 20);
}

#[test]
fn errors_render_readable_messages() {
    let err = TinyDetError::InvalidTensorShape {
        expected: 21125,
        got: 7,
    };
    assert_eq!(
        err.to_string(),
        "invalid tensor shape: expected 21125 values, got 7"
    );
    let err = TinyDetError::from(ConfigIssue::LabelCount {
        expected: 20,
        got: 19,
    });
    assert_eq!(
        err.to_string(),
        "invalid configuration: label table has 19 entries, expected 20"
    );
}
