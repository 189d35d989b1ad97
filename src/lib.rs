// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod buckets;
pub mod cli;
pub mod commands;
pub mod db;
pub mod distribution;
pub mod models;
pub mod settings;
pub mod suggest;
pub mod summary;
pub mod taxonomy;
pub mod utils;
