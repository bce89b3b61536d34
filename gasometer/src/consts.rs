pub const G_CONSTANT: u32 = 1;
pub const G_CONDITIONAL: u32 = 1;

pub const G_REFERENCE: u32 = 1;
pub const G_LET: u32 = 1;
pub const G_PROPERTY: u32 = 1;
pub const G_USER_FUNCTION: u32 = 1;

pub const G_LEGACY_REFERENCE: u32 = 2;
pub const G_LEGACY_LET: u32 = 5;
pub const G_LEGACY_PROPERTY: u32 = 2;
pub const G_LEGACY_USER_FUNCTION: u32 = 0;
