// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{thread_rng, Rng};

use moneta::currency::USD;
use moneta::{AllocateOptions, Context, ExchangeRate, Money, Rational, ScaledDecimal};

fn bench_add_scaled(a: ScaledDecimal, b: ScaledDecimal, bencher: &mut Bencher) {
    bencher.iter_with_setup(|| (a.clone(), b.clone()), |(a, b)| &a + &b)
}

fn bench_to_scaled_lossy(r: Rational, bencher: &mut Bencher) {
    let cx = Context::default();
    bencher.iter_with_setup(|| r.clone(), |r| r.to_scaled_lossy(&cx))
}

fn bench_allocate(m: Money, ratios: Vec<u32>, bencher: &mut Bencher) {
    bencher.iter_with_setup(
        || m.clone(),
        |m| m.allocate(&ratios, AllocateOptions::default()),
    )
}

pub fn bench_arithmetic(c: &mut Criterion) {
    // add_scaled
    let mut rng = thread_rng();
    let a = ScaledDecimal::new(rng.gen::<i64>(), 2);
    let b = ScaledDecimal::new(rng.gen::<i64>(), 7);
    c.bench_function("add_scaled", |bencher| {
        bench_add_scaled(a.clone(), b.clone(), bencher)
    });

    // to_scaled_lossy
    let mut rng = thread_rng();
    let r = Rational::new(rng.gen::<i64>(), 3 * i64::from(rng.gen::<u16>()) + 7).unwrap();
    c.bench_function("to_scaled_lossy", |bencher| {
        bench_to_scaled_lossy(r.clone(), bencher)
    });
}

pub fn bench_money(c: &mut Criterion) {
    // allocate
    let mut rng = thread_rng();
    let m = Money::from_minor_units(USD, rng.gen());
    let ratios: Vec<u32> = (0..16).map(|_| rng.gen_range(1, 100)).collect();
    c.bench_function("allocate", |bencher| {
        bench_allocate(m.clone(), ratios.clone(), bencher)
    });

    // convert
    let rate = ExchangeRate::new("$300".parse().unwrap(), "1 BTC".parse().unwrap()).unwrap();
    let m = Money::from_minor_units(USD, rng.gen());
    c.bench_function("convert", |bencher| {
        bencher.iter_with_setup(|| m.clone(), |m| m.convert(&rate))
    });

    // parse
    c.bench_function("parse", |bencher| {
        bencher.iter(|| "1.234.567,89 EUR".parse::<Money>())
    });
}

criterion_group!(benches, bench_arithmetic, bench_money);
criterion_main!(benches);
