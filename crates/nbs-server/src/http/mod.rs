// SPDX-License-Identifier: Apache-2.0

mod handlers;
mod support;

pub(crate) use handlers::{
    create_solution_handler, get_solution_by_name_handler, get_solution_handler,
    get_target_handler, healthz_handler, list_solutions_handler, list_targets_handler,
    openapi_handler, readyz_handler, root_handler,
};
