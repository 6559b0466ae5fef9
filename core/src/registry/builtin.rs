use super::{Model, ModelDescriptor};
use crate::recipes::{GridfinityPreset, HexagonPreset, OrnamentPreset, RingPreset, StrapPreset};

pub(super) fn descriptors() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new(
            "vent-ring",
            "Vent Ring",
            "Ring/cylinder (48.2mm outer, 46.4mm inner, 5mm height)",
            Model::Ring(RingPreset::VentRing.params()),
        ),
        ModelDescriptor::new(
            "vent-ring-snug",
            "Vent Ring (snug)",
            "Ring/cylinder (47.9mm outer, 46.1mm inner, 5mm height)",
            Model::Ring(RingPreset::VentRingSnug.params()),
        ),
        ModelDescriptor::new(
            "hexagon",
            "Custom Hexagon",
            "Hexagon (120mm x 60mm with triangular extensions)",
            Model::Hexagon(HexagonPreset::Hexagon.params()),
        ),
        ModelDescriptor::new(
            "hexagon-equiangular",
            "Equiangular Hexagon",
            "Hexagon with 120° corners (120mm long sides, 42.43mm short sides)",
            Model::Hexagon(HexagonPreset::HexagonEquiangular.params()),
        ),
        ModelDescriptor::new(
            "dupont-strap",
            "DuPont Strap",
            "Strap holding a row of single-pin DuPont connectors",
            Model::Strap(StrapPreset::DupontStrap.params()),
        ),
        ModelDescriptor::new(
            "christmas-ornament",
            "Christmas Ornament",
            "Flat ornament ball with a knob and ribbon hole",
            Model::Ornament(OrnamentPreset::ChristmasOrnament.params()),
        ),
        ModelDescriptor::new(
            "gridfinity-test",
            "Gridfinity Test Bin",
            "3x2 gridfinity bin, 21mm high",
            Model::Gridfinity(GridfinityPreset::Test.bin()),
        ),
        ModelDescriptor::new(
            "gridfinity-screwdriver",
            "Gridfinity Screwdriver Holder",
            "2x4 gridfinity bin with a cradle bar for screwdrivers",
            Model::Gridfinity(GridfinityPreset::Screwdriver.bin()),
        ),
        ModelDescriptor::new(
            "gridfinity-screwdriver-dual",
            "Gridfinity Dual Screwdriver Holder",
            "2x4 gridfinity bin with two bars of alternating cradles",
            Model::Gridfinity(GridfinityPreset::ScrewdriverDual.bin()),
        ),
        ModelDescriptor::new(
            "gridfinity-shaver-box",
            "Gridfinity Shaver Box",
            "2x3 gridfinity bin with side wall cutouts",
            Model::Gridfinity(GridfinityPreset::ShaverBox.bin()),
        ),
    ]
}
