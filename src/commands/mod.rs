// Copyright (c) Bucketeer.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod months;
pub mod movements;
pub mod payday;
pub mod settings;
