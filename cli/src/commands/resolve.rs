use voucherbot_core::ContactDirectory;

use crate::util::print_json;

pub fn run(
    directory: &ContactDirectory,
    program: Option<&str>,
    borough: Option<&str>,
    is_discrimination: bool,
    use_borough_office: bool,
) -> i32 {
    let contact = directory.resolve(program, borough, is_discrimination, use_borough_office);
    print_json(&contact)
}
