use eg_weather::Coordinate;

/// One fixed polling location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    /// Short stable code, used in observation ids
    pub code: &'static str,
    /// Sea-area label shown next to a detection
    pub label: &'static str,
    pub coordinate: Coordinate,
}

/// Western Pacific checkpoints where typhoons commonly form or pass.
pub const CHECKPOINTS: [Checkpoint; 5] = [
    Checkpoint {
        code: "phl-east",
        label: "菲律賓東方海面",
        coordinate: Coordinate::new(15.0, 140.0),
    },
    Checkpoint {
        code: "guam",
        label: "關島附近",
        coordinate: Coordinate::new(20.0, 135.0),
    },
    Checkpoint {
        code: "okinawa-south",
        label: "沖繩南方",
        coordinate: Coordinate::new(25.0, 130.0),
    },
    Checkpoint {
        code: "luzon-east",
        label: "呂宋島東方",
        coordinate: Coordinate::new(18.0, 125.0),
    },
    Checkpoint {
        code: "taiwan-east",
        label: "台灣東方海面",
        coordinate: Coordinate::new(22.0, 120.0),
    },
];
