//! Member names of the external object model.

// Case
pub const TITLE: &str = "Title";
pub const VISIBLE: &str = "Visible";
pub const SOLVER: &str = "Solver";
pub const CAN_SOLVE: &str = "CanSolve";
pub const FLOWSHEET: &str = "Flowsheet";
pub const SAVE: &str = "Save";
pub const CLOSE: &str = "Close";

// Flowsheet
pub const FLUID_PACKAGE: &str = "FluidPackage";
pub const PROPERTY_PACKAGE_NAME: &str = "PropertyPackageName";
pub const COMPONENTS: &str = "Components";
pub const OPERATIONS: &str = "Operations";
pub const MATERIAL_STREAMS: &str = "MaterialStreams";
pub const ENERGY_STREAMS: &str = "EnergyStreams";

// Streams
pub const UPSTREAM_OPERS: &str = "UpstreamOpers";
pub const DOWNSTREAM_OPERS: &str = "DownstreamOpers";

// Operations
pub const ATTACHED_FEEDS: &str = "AttachedFeeds";
pub const ATTACHED_PRODUCTS: &str = "AttachedProducts";
pub const COLUMN_FLOWSHEET: &str = "ColumnFlowsheet";
/// Operation name of the main tower inside a column sub-flowsheet.
pub const MAIN_TOWER: &str = "Main TS";

// Type tags of the objects that are not unit operations
pub const CASE_TYPE: &str = "simulationcase";
pub const SOLVER_TYPE: &str = "solver";
pub const FLOWSHEET_TYPE: &str = "flowsheet";
pub const FLUID_PACKAGE_TYPE: &str = "fluidpackage";
pub const MATERIAL_STREAM_TYPE: &str = "materialstream";
pub const ENERGY_STREAM_TYPE: &str = "energystream";
