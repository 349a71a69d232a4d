//! Types the build script generates mappers for.

use mapgen_codegen::MapTo;
use mapgen_runtime::Condition;

/// Keeps ages of adults, replaces the rest with 18.
#[derive(Debug, Default)]
pub struct AdultOnly;

impl Condition<u32> for AdultOnly {
    fn decide(&self, value: &u32) -> bool {
        *value >= 18
    }

    fn default_value(&self) -> u32 {
        18
    }
}

/// Clamps negative readings to zero.
#[derive(Debug, Default)]
pub struct NonNegative;

impl Condition<i32> for NonNegative {
    fn decide(&self, value: &i32) -> bool {
        *value >= 0
    }

    fn default_value(&self) -> i32 {
        0
    }
}

/// Registration qualifier for the film mapper.
#[derive(Debug)]
pub struct Primary;

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Profile,
    generate_extensions = true,
    property_map(from = "age", to = "age", condition = AdultOnly),
)]
#[register(named = "profiles", created_at_start = true, bind_interfaces = true)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = User,
    is_async = false,
    singleton = true,
    generate_reverse = true,
    generate_extensions = true,
    one_line = true,
)]
#[property_map(from = "name", to = "full_name")]
#[register(singleton = false, constructor_style = false)]
pub struct UserDto {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(target = FilmView, is_async = false, target_nullable = true)]
#[register(named_type = Primary)]
pub struct Film {
    pub title: String,
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilmView {
    pub title: String,
    pub year: u16,
}

/// Target of the nullability matrix below.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    one_line = false,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct DirectBlock {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    one_line = true,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct DirectLine {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    target_nullable = true,
    one_line = false,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct WidenedBlock {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    target_nullable = true,
    one_line = true,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct WidenedLine {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    source_nullable = true,
    one_line = false,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct RequiredBlock {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    source_nullable = true,
    one_line = true,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct RequiredLine {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    source_nullable = true,
    target_nullable = true,
    one_line = false,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct OptionalBlock {
    pub sensor: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, MapTo)]
#[map_to(
    target = Sample,
    is_async = false,
    source_nullable = true,
    target_nullable = true,
    one_line = true,
    property_map(from = "value", to = "value", condition = NonNegative),
)]
pub struct OptionalLine {
    pub sensor: String,
    pub value: i32,
}
